use clap::{Arg, ArgAction, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("importwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Watch an import job's status endpoint until the status changes")
        .long_about("importwatch polls the status endpoint of a long-running import job while it is 'created' (every second) or 'running' (every ten seconds), and re-renders the job once the server reports a different status. Terminal statuses are not polled.")
        .arg(
            Arg::new("page-data")
                .long("page-data")
                .help("JSON file with the job page data (status, job_id, status_url, page_url)")
                .env("IMPORTWATCH_PAGE_DATA")
        )
        .arg(
            Arg::new("status")
                .long("status")
                .short('s')
                .help("Status the job page was rendered with (overrides page data)")
                .env("IMPORTWATCH_STATUS")
        )
        .arg(
            Arg::new("job-id")
                .long("job-id")
                .short('j')
                .help("Job identifier (overrides page data)")
                .env("IMPORTWATCH_JOB_ID")
        )
        .arg(
            Arg::new("status-url")
                .long("status-url")
                .help("Absolute status endpoint url")
                .env("IMPORTWATCH_STATUS_URL")
        )
        .arg(
            Arg::new("url-template")
                .long("url-template")
                .help("Status endpoint url with a {job_id} placeholder")
                .env("IMPORTWATCH_URL_TEMPLATE")
        )
        .arg(
            Arg::new("page-url")
                .long("page-url")
                .help("Job page url; the endpoint is derived by appending --suffix")
                .env("IMPORTWATCH_PAGE_URL")
        )
        .arg(
            Arg::new("suffix")
                .long("suffix")
                .help("Suffix appended to --page-url")
                .default_value("get/")
        )
        .arg(
            Arg::new("created-interval-ms")
                .long("created-interval-ms")
                .help("Delay between polls while the job is 'created'")
                .value_parser(value_parser!(u64))
                .default_value("1000")
        )
        .arg(
            Arg::new("running-interval-ms")
                .long("running-interval-ms")
                .help("Delay between polls while the job is 'running'")
                .value_parser(value_parser!(u64))
                .default_value("10000")
        )
        .arg(
            Arg::new("retry-max-attempts")
                .long("retry-max-attempts")
                .help("Retry failed requests up to this many consecutive failures (default: stop on first failure)")
                .value_parser(value_parser!(u32))
        )
        .arg(
            Arg::new("retry-base-ms")
                .long("retry-base-ms")
                .help("Delay after the first failed request when retrying")
                .value_parser(value_parser!(u64))
                .default_value("2000")
        )
        .arg(
            Arg::new("timeout-secs")
                .long("timeout-secs")
                .help("Per-request timeout")
                .value_parser(value_parser!(u64))
                .default_value("30")
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print status changes as JSON on stdout")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Emit logs as JSON")
                .action(ArgAction::SetTrue)
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
        )
}
