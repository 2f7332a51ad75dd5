//! Build-plumbing shim, not part of the library's behavior.
//!
//! `wasmer-vm` (pulled in transitively through `ark-circom`) references the
//! external symbol `__rust_probestack` on x86/x86_64 to wire up its stack
//! probe intrinsic. Recent Rust toolchains no longer ship that symbol in
//! `compiler_builtins` (stack probing moved to LLVM-inlined code), so linking
//! any executable that pulls in `wasmer-vm` — every test binary here — fails
//! with `undefined symbol: __rust_probestack`.
//!
//! We satisfy the linker with an empty definition. This is exactly the
//! fallback `wasmer-vm` itself uses for architectures without a stack-probe
//! intrinsic (`empty_probestack`), so it is a no-op of the same shape. The
//! symbol is emitted as *weak*, so a toolchain that still provides the real
//! `__rust_probestack` wins and there is no duplicate-definition error.
//!
//! Only object/executable links consume this; the library rlib is unaffected.

use std::{
    env,
    path::Path,
    process::Command,
};

fn main() {
    println!("cargo::rerun-if-changed=build.rs");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if arch != "x86_64" && arch != "x86" {
        // On other architectures wasmer-vm uses its own in-crate
        // `empty_probestack` and references no external symbol.
        return;
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let src = Path::new(&out_dir).join("probestack_stub.c");
    let obj = Path::new(&out_dir).join("probestack_stub.o");

    std::fs::write(
        &src,
        "__attribute__((weak)) void __rust_probestack(void) {}\n",
    )
    .expect("failed to write probestack stub source");

    let cc = env::var("CC").unwrap_or_else(|_| "cc".to_string());
    let status = Command::new(&cc)
        .args(["-c", "-fPIC", "-o"])
        .arg(&obj)
        .arg(&src)
        .status()
        .expect("failed to invoke C compiler for probestack stub");
    assert!(status.success(), "probestack stub compilation failed");

    // Applies to binary/test/bench links (never the rlib), satisfying the
    // undefined reference from wasmer-vm.
    println!("cargo::rustc-link-arg={}", obj.display());
}
