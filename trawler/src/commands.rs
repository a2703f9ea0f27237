use crate::CLAP_STYLING;
use clap::{ArgAction, arg};

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("trawler")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("trawler")
        .about("Crawl a single host over raw HTTP/1.1, printing every link found")
        .styles(CLAP_STYLING)
        .arg(
            arg!([THREADS])
                .help("Number of concurrent fetch workers per round (positive integer)")
                .allow_negative_numbers(true),
        )
        .arg(arg!([URL]).help(
            "Seed URL, e.g. http://www.example.com/docs (use @PATH to read it from a file)",
        ))
        .arg(arg!(-q --"quiet" "Suppress the banner").required(false))
        .arg(
            arg!(-v --"verbose" "Raise log verbosity (-v info, -vv debug)")
                .action(ArgAction::Count),
        )
        .arg(
            arg!(--"chunk-size" <BYTES>)
                .required(false)
                .help("Size of each socket read")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("4096"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Deadline for connecting and for every socket read and write (default: none)")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(--"port" <PORT>)
                .required(false)
                .help("TCP port requests are sent to")
                .value_parser(clap::value_parser!(u16).range(1..))
                .default_value("80"),
        )
        .arg(
            arg!(--"dedup")
                .required(false)
                .help("Never enqueue a path twice")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"same-host")
                .required(false)
                .help("Resolve links against the current page and only follow ones on the seed host")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(--"max-rounds" <ROUNDS>)
                .required(false)
                .help("Stop after this many rounds")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"summary" <FORMAT>)
                .required(false)
                .help("Print a crawl summary to stderr when done")
                .value_parser(["text", "json"]),
        )
}
