use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use mavcodec::protocol::Checksum;
use mavcodec::{Message, ProtocolVersion, Registry, dialect};

fn heartbeat(registry: &Registry) -> Message {
    registry
        .message("HEARTBEAT")
        .and_then(|m| m.with("type", 2u8))
        .and_then(|m| m.with("autopilot", 3u8))
        .and_then(|m| m.with("mavlink_version", 3u8))
        .unwrap()
}

fn statustext(registry: &Registry) -> Message {
    registry
        .message("STATUSTEXT")
        .and_then(|m| m.with("severity", 6u8))
        .and_then(|m| m.with("text", "PreArm: Gyros inconsistent"))
        .and_then(|m| m.with("id", 7u16))
        .unwrap()
}

fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");

    let data = vec![0xA5u8; 255];
    group.throughput(Throughput::Bytes(255));
    group.bench_function("crc_255b", |b| {
        b.iter(|| {
            let mut crc = Checksum::new();
            crc.update_bytes(black_box(&data));
            black_box(crc.value());
        });
    });

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let registry = dialect::common();
    let mut group = c.benchmark_group("codec");

    // Small fixed-length message (9 byte payload)
    let small_msg = heartbeat(&registry);
    group.throughput(Throughput::Bytes(9));
    group.bench_function("encode_heartbeat_v1", |b| {
        b.iter(|| {
            black_box(small_msg.encode(&registry, ProtocolVersion::V1).unwrap());
        });
    });
    group.bench_function("encode_heartbeat_v2", |b| {
        b.iter(|| {
            black_box(small_msg.encode(&registry, ProtocolVersion::V2).unwrap());
        });
    });

    // Text message with extensions (54 byte payload before trimming)
    let text_msg = statustext(&registry);
    group.throughput(Throughput::Bytes(54));
    group.bench_function("encode_statustext_v2", |b| {
        b.iter(|| {
            black_box(text_msg.encode(&registry, ProtocolVersion::V2).unwrap());
        });
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let registry = dialect::common();
    let mut group = c.benchmark_group("codec");

    let small_encoded = heartbeat(&registry)
        .encode(&registry, ProtocolVersion::V2)
        .unwrap();
    group.throughput(Throughput::Bytes(9));
    group.bench_function("decode_heartbeat_v2", |b| {
        b.iter(|| {
            black_box(Message::decode(&registry, &small_encoded).unwrap());
        });
    });

    let text_encoded = statustext(&registry)
        .encode(&registry, ProtocolVersion::V2)
        .unwrap();
    group.throughput(Throughput::Bytes(54));
    group.bench_function("decode_statustext_v2", |b| {
        b.iter(|| {
            black_box(Message::decode(&registry, &text_encoded).unwrap());
        });
    });

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let registry = dialect::common();
    let mut group = c.benchmark_group("codec");

    let msg = statustext(&registry);
    group.throughput(Throughput::Bytes(54));
    group.bench_function("roundtrip_statustext", |b| {
        b.iter(|| {
            let encoded = msg.encode(&registry, ProtocolVersion::V2).unwrap();
            black_box(Message::decode(&registry, &encoded).unwrap());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_checksum,
    bench_encode,
    bench_decode,
    bench_roundtrip
);
criterion_main!(benches);
