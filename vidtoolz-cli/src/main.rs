// vidtoolz-cli/src/main.rs
//
// The `vidtoolz` binary.

fn main() {
    std::process::exit(vidtoolz_cli::run());
}
