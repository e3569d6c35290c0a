fn main() {
    // chmlib rarely ships a .pc file, so fall back to the plain library name.
    if pkg_config::Config::new().probe("chmlib").is_err() {
        println!("cargo:rustc-link-lib=chm");
    }
}
