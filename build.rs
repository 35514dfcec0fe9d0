//! Build script which collects information about the build for writing to output metadata.
fn main() {
    built::write_built_file().expect("Failed to acquire build-time information");
}
