#![forbid(unsafe_code)]

/// `embed_migrations!` is not rerun when only the SQL files under
/// `src/migrations` change, so the build script asks cargo to track the
/// directory explicitly.
fn main() {
    println!("cargo:rerun-if-changed=./src/migrations");
}
