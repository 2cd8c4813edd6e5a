// vidtoolz-cli/src/bin/vid.rs
//
// Short alias for the `vidtoolz` binary.

fn main() {
    std::process::exit(vidtoolz_cli::run());
}
