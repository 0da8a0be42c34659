fn main() {
    uniffi::generate_scaffolding("src/divelog_filter.udl").unwrap();
}
