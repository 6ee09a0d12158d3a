fn main() {
    // ESP-IDF link arguments only exist when cross-compiling for the watch;
    // host builds (tests, simulator) skip them.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
