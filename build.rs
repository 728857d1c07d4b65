fn main() {
    // ESP-IDF link/env metadata is only meaningful for the firmware build;
    // host-target test builds skip it entirely.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
