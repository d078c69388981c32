//! Build script for ironwall
//!
//! Embeds build-time information (git commit, dirty status, build timestamp)
//! shown by `ironwall --version`.

fn main() {
    shadow_rs::ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build info");
}
