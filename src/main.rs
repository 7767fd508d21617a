use std::process::ExitCode;

fn main() -> ExitCode {
    ytm_playlist_dl_lib::run()
}
