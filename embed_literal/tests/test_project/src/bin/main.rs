use std::panic;

include!(concat!(env!("OUT_DIR"), "/plain.rs"));
include!(concat!(env!("OUT_DIR"), "/listed.rs"));
include!(concat!(env!("OUT_DIR"), "/packed.rs"));
include!(concat!(env!("OUT_DIR"), "/packed_listed.rs"));
include!(concat!(env!("OUT_DIR"), "/single.rs"));
include!(concat!(env!("OUT_DIR"), "/corrupt.rs"));

const EXPECTED: [(&str, &[u8]); 3] = [
    ("blobs/file.txt", include_bytes!("../../blobs/file.txt")),
    ("blobs/all_bytes.bin", include_bytes!("../../blobs/all_bytes.bin")),
    ("blobs/empty.txt", include_bytes!("../../blobs/empty.txt")),
];

fn check(label: &str, table: &[(&str, &[u8])], buffers: [&[u8]; 3]) {
    assert_eq!(table.len(), EXPECTED.len(), "{label}: wrong table size");
    for (&(name, data), (expected_name, expected_data)) in table.iter().zip(EXPECTED) {
        assert_eq!(name, expected_name, "{label}: table out of order");
        assert_eq!(data, expected_data, "{label}: entry '{name}' differs");
    }
    for (data, (name, expected_data)) in buffers.into_iter().zip(EXPECTED) {
        assert_eq!(data, expected_data, "{label}: buffer '{name}' differs");
    }
    println!("{label}: {} buffers match", table.len());
}

/// Reading a buffer whose payload cannot be decompressed panics with the
/// module path, and every later read panics too.
fn check_corrupt() {
    panic::set_hook(Box::new(|_| {}));
    let first = panic::catch_unwind(|| corrupt::BAD.len());
    let second = panic::catch_unwind(|| corrupt::BAD.len());
    let _ = panic::take_hook();

    let payload = first.expect_err("corrupt: payload decompressed");
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .unwrap_or_default();
    let prefix = "test_project::corrupt: failed to decompress embedded data: ";
    assert!(
        message.starts_with(prefix),
        "corrupt: panicked with {message:?}"
    );
    assert!(second.is_err(), "corrupt: guard recovered after a failure");
    println!("corrupt: guard panics and stays poisoned");
}

fn main() {
    let buffers = [plain::FILES_0, plain::FILES_1, plain::FILES_2];
    check("plain", &plain::FILES, buffers);

    let buffers = [listed::FILES_0, listed::FILES_1, listed::FILES_2];
    check("listed", &listed::FILES, buffers);

    let buffers = [*packed::FILES_0, *packed::FILES_1, *packed::FILES_2];
    check("packed", &*packed::FILES, buffers);

    let buffers = [
        *packed_listed::FILES_0,
        *packed_listed::FILES_1,
        *packed_listed::FILES_2,
    ];
    check("packed_listed", &*packed_listed::FILES, buffers);

    let s = std::str::from_utf8(*single::TEXT).expect("not UTF-8");
    println!("{s}");
    assert_eq!(s, "Contents of file.txt\n");

    check_corrupt();

    println!("Decompressed data matches original.");
}
