use anyhow::Context;
use clap::Parser;
use digrr::dns::resolver::{
    DnsMessage, RecordClass, RecordType, ResourceRecord, parse_record_type, resolve,
};
use std::time::{Duration, Instant};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "digrr")]
#[command(version)]
#[command(about = "digrr - send one DNS query over UDP and print the response")]
struct Cli {
    /// Domain name to look up
    domain: String,

    /// Name server to query (IP literal or host name)
    #[arg(short = 's', long, default_value = "d.root-servers.net.")]
    server: String,

    /// Record type mnemonic (A, NS, MX, ...) or numeric code
    #[arg(short = 't', long = "type", default_value = "NS", value_parser = parse_record_type)]
    qtype: u16,

    /// How long to wait for the answer, in milliseconds
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,

    /// Print the decoded message as JSON
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG wins when set
    #[arg(long)]
    log_level: Option<String>,
}

fn init_logging(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or("warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    debug!(server = %cli.server, domain = %cli.domain, qtype = cli.qtype, "sending query");

    let started = Instant::now();
    let response = resolve(
        &cli.server,
        &cli.domain,
        cli.qtype,
        Duration::from_millis(cli.timeout_ms),
    );

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "query failed");
            // Nothing came back, so the question sent is all there is to show.
            if cli.json {
                let failure = failure_report(&cli.domain, cli.qtype, &e.to_string());
                println!("{}", serde_json::to_string_pretty(&failure)?);
            } else {
                println!(";; QUESTION SECTION:");
                print_question(&cli.domain, RecordClass::In.into(), cli.qtype);
                println!("\n;; {e}");
                println!(";; SERVER: {}", cli.server);
            }
            return Err(e).with_context(|| {
                format!("query for {} to {} failed", cli.domain, cli.server)
            });
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_message(&response, &cli.server, started.elapsed());
    }

    Ok(())
}

fn type_name(code: u16) -> String {
    RecordType::from_u16(code)
        .map(|t| t.mnemonic().to_string())
        .unwrap_or_else(|| format!("TYPE{code}"))
}

fn class_name(code: u16) -> String {
    RecordClass::from_u16(code)
        .map(|c| c.mnemonic().to_string())
        .unwrap_or_else(|| format!("CLASS{code}"))
}

fn print_message(msg: &DnsMessage, server: &str, elapsed: Duration) {
    let flags = msg.flags();
    let mut set = Vec::new();
    for (on, name) in [
        (flags.qr, "qr"),
        (flags.aa, "aa"),
        (flags.tc, "tc"),
        (flags.rd, "rd"),
        (flags.ra, "ra"),
    ] {
        if on {
            set.push(name);
        }
    }

    println!(
        ";; ->>HEADER<<- opcode: {}, status: {:?}, id: {}",
        flags.opcode,
        msg.response_code(),
        msg.header.id
    );
    println!(
        ";; flags: {}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
        set.join(" "),
        msg.header.qd_count,
        msg.header.an_count,
        msg.header.ns_count,
        msg.header.ar_count
    );
    if flags.tc {
        println!(";; WARNING: response truncated, some records may be missing");
    }

    println!("\n;; QUESTION SECTION:");
    for q in &msg.question {
        print_question(&q.name, q.class, q.record_type);
    }

    print_section("ANSWER", &msg.answer);
    print_section("AUTHORITY", &msg.authority);
    print_section("ADDITIONAL", &msg.additional);

    println!("\n;; Query time: {} msec", elapsed.as_millis());
    println!(";; SERVER: {server}");
}

fn failure_report(domain: &str, qtype: u16, error: &str) -> serde_json::Value {
    serde_json::json!({
        "question": [{
            "name": domain,
            "record_type": qtype,
            "class": u16::from(RecordClass::In),
        }],
        "error": error,
    })
}

fn print_question(name: &str, class: u16, record_type: u16) {
    println!(";{name}\t\t{}\t{}", class_name(class), type_name(record_type));
}

fn print_section(title: &str, records: &[ResourceRecord]) {
    if records.is_empty() {
        return;
    }
    println!("\n;; {title} SECTION:");
    for record in records {
        println!("{record}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_report_keeps_the_question() {
        let report = failure_report("example.com", 33, "The name server did not answer within 3s");

        assert_eq!(report["question"][0]["name"], "example.com");
        assert_eq!(report["question"][0]["record_type"], 33);
        assert_eq!(report["question"][0]["class"], 1);
        assert_eq!(report["error"], "The name server did not answer within 3s");
    }

    #[test]
    fn test_presentation_names() {
        assert_eq!(type_name(33), "SRV");
        assert_eq!(type_name(65280), "TYPE65280");
        assert_eq!(class_name(1), "IN");
        assert_eq!(class_name(7), "CLASS7");
    }

    #[test]
    fn test_cli_parses_type_mnemonics() {
        let cli = Cli::try_parse_from(["digrr", "example.com", "-t", "srv"]).unwrap();
        assert_eq!(cli.qtype, 33);
        assert_eq!(cli.server, "d.root-servers.net.");

        let cli = Cli::try_parse_from(["digrr", "example.com"]).unwrap();
        assert_eq!(cli.qtype, 2);

        assert!(Cli::try_parse_from(["digrr", "example.com", "-t", "bogus"]).is_err());
    }
}
