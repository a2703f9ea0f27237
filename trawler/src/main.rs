use clap::error::ErrorKind;
use trawler::commands::command_argument_builder;
use trawler::handlers::{EXIT_FAILURE, handle_crawl};

fn main() {
    let matches = match command_argument_builder().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_FAILURE);
        }
    };

    std::process::exit(handle_crawl(&matches));
}
