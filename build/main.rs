use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

fn main() {
    let dest = PathBuf::from(env::var("OUT_DIR").unwrap());

    println!("cargo:rerun-if-changed=build/main.rs");

    let mut file = BufWriter::new(File::create(dest.join("gl_bindings.rs")).unwrap());

    // the surface programs only need the GLES 2.0 shader entry points
    Registry::new(Api::Gles2, (2, 0), Profile::Core, Fallbacks::All, [])
        .write_bindings(StructGenerator, &mut file)
        .unwrap();
}
