fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Only flash builds need the ESP-IDF environment; host test builds
    // skip embuild entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
