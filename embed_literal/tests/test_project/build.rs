use std::{env, fs, path::PathBuf};

use embed_literal::{Config, Encoding};

const BLOBS: [&str; 3] = ["blobs/file.txt", "blobs/all_bytes.bin", "blobs/empty.txt"];

const CORRUPT_DECL: &str = "    static BAD_zstd: &[u8] = ";

fn main() {
    Config::new("plain", "FILES")
        .build(BLOBS, "plain.rs")
        .expect("Failed to generate plain module");

    Config::new("listed", "FILES")
        .encoding(Encoding::ElementList)
        .build(BLOBS, "listed.rs")
        .expect("Failed to generate listed module");

    Config::new("packed", "FILES")
        .compress(true)
        .build(BLOBS, "packed.rs")
        .expect("Failed to generate packed module");

    Config::new("packed_listed", "FILES")
        .compress(true)
        .level(3)
        .encoding(Encoding::ElementList)
        .build(BLOBS, "packed_listed.rs")
        .expect("Failed to generate packed_listed module");

    // A single anonymous buffer, as the command line produces from stdin.
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR not set"));
    let input = fs::File::open(BLOBS[0]).expect("Failed to open blob");
    Config::new("single", "TEXT")
        .compress(true)
        .plan_stream(input)
        .and_then(|plan| plan.write_to(out_dir.join("single.rs")))
        .expect("Failed to generate single module");

    // A compressed module whose payload is not a zstd frame.
    let mut corrupt = Vec::new();
    Config::new("corrupt", "BAD")
        .compress(true)
        .plan_stream(&b"never decompressed"[..])
        .and_then(|plan| plan.emit(&mut corrupt))
        .expect("Failed to generate corrupt module");
    let corrupt = String::from_utf8(corrupt).expect("generated code is ASCII");
    let corrupt: String = corrupt
        .lines()
        .map(|line| {
            if line.starts_with(CORRUPT_DECL) {
                format!("{CORRUPT_DECL}b\"not a zstd frame\";\n")
            } else {
                format!("{line}\n")
            }
        })
        .collect();
    fs::write(out_dir.join("corrupt.rs"), corrupt).expect("Failed to write corrupt module");
}
