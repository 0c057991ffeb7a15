use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=public/");
    println!("cargo:rerun-if-changed=tessdata/");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => return,
    };

    if !manifest_dir.join("public").join("index.html").exists() {
        println!("cargo:warning=No public/index.html found. `serve` will have no main page.");
    }

    if manifest_dir.join("tessdata").exists() {
        println!("cargo:warning=Found local tessdata directory; set TESSDATA_PREFIX to use it");
    } else {
        println!("cargo:warning=No tessdata directory found. Tesseract will use system data.");
    }
}
