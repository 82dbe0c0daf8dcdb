//! Heartbeat round trip using mavcodec

use std::sync::Arc;

use mavcodec::{Codec, ProtocolVersion, dialect};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("mavcodec Heartbeat Example");
    println!("==========================\n");

    let codec = Codec::new(Arc::new(dialect::common()));

    // Create a message stamped with the codec's system and component ids
    let heartbeat = codec
        .new_message("HEARTBEAT")?
        .with("type", 2u8)?
        .with("autopilot", 3u8)?
        .with("base_mode", 0x51u8)?
        .with("system_status", 4u8)?
        .with("mavlink_version", 3u8)?;
    println!("Created: {heartbeat}");

    // Encode with both protocol generations
    for version in [ProtocolVersion::V1, ProtocolVersion::V2] {
        let encoded = codec.encode(&heartbeat, version)?;
        println!("Encoded {version} to {} bytes: {}", encoded.len(), hex(&encoded));

        let decoded = codec.decode(&encoded)?;
        println!("Decoded: {decoded}");
        assert_eq!(decoded.values(), heartbeat.values());
    }

    // A corrupted frame is reported, not fatal
    let mut corrupted = codec.encode(&heartbeat, ProtocolVersion::V2)?;
    corrupted[12] ^= 0xFF;
    match codec.decode(&corrupted) {
        Ok(_) => println!("Corruption went unnoticed"),
        Err(err) => println!("Rejected corrupted frame: {err}"),
    }

    let stats = codec.stats();
    println!(
        "\nStats: encoded={}, decoded={}, errors={}",
        stats.frames_encoded,
        stats.frames_decoded,
        stats.total_errors()
    );

    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
