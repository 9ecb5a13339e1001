//! Generate `madmimi.h` from the `extern "C"` surface into `OUT_DIR`.
//!
//! Header generation is best effort: a cbindgen parse failure leaves the
//! library build untouched.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let (Ok(crate_dir), Ok(out_dir)) = (env::var("CARGO_MANIFEST_DIR"), env::var("OUT_DIR")) else {
        return;
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("MADMIMI_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(PathBuf::from(out_dir).join("madmimi.h"));
        }
        Err(err) => println!("cargo:warning=madmimi.h not generated: {err}"),
    }
}
