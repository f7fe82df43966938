//! Annobind demo: bind a DNS load-balancer config from a resource manifest.
//!
//! ```text
//! cargo run --example annotations_demo                   # built-in manifest
//! cargo run --example annotations_demo -- service.json   # manifest file (JSON)
//! cargo run --example annotations_demo -- dns.toml       # flat TOML annotations
//! ```
//!
//! The report lists every resolved key before binding, then the bound
//! struct is printed.

use std::path::Path;
use std::process::ExitCode;

use annobind::{Annotated, BindError, Field, Mapping, describe, source};

const SAMPLE_MANIFEST: &str = r#"{
    "apiVersion": "v1",
    "kind": "Service",
    "metadata": {
        "name": "web",
        "annotations": {
            "dns-ttl-seconds": "45",
            "geo-tags": "eu, us",
            "weights": "3, 1",
            "infoblox_host": "ib.example.com"
        }
    }
}"#;

#[derive(Debug, Default)]
struct DnsConfig {
    ttl: u32,
    strategy: String,
    geo_tags: Vec<String>,
    weights: Vec<u8>,
    infoblox: Infoblox,
}

impl Annotated for DnsConfig {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::leaf("ttl", "dns-ttl-seconds,default=30", &mut self.ttl),
            Field::leaf("strategy", "strategy,default=roundRobin", &mut self.strategy),
            Field::leaf("geo_tags", "geo-tags,default=[us]", &mut self.geo_tags),
            Field::leaf("weights", "weights,default=[]", &mut self.weights),
            Field::nested("infoblox", "infoblox", &mut self.infoblox),
        ]
    }
}

#[derive(Debug, Default)]
struct Infoblox {
    host: String,
    port: u16,
}

impl Annotated for Infoblox {
    fn fields(&mut self) -> Vec<Field<'_>> {
        vec![
            Field::leaf("host", "host,require=true", &mut self.host),
            Field::leaf("port", "port,default=443", &mut self.port),
        ]
    }
}

fn load(arg: Option<String>) -> Result<Mapping, BindError> {
    match arg {
        None => source::from_manifest_json(SAMPLE_MANIFEST),
        Some(path) if path.ends_with(".json") => {
            let content = std::fs::read_to_string(&path).map_err(|e| BindError::IoError {
                path: path.clone().into(),
                source: e,
            })?;
            source::from_manifest_json(&content)
        }
        Some(path) => source::from_file(Path::new(&path)),
    }
}

fn run() -> Result<(), BindError> {
    let annotations = load(std::env::args().nth(1))?;

    let mut config = DnsConfig::default();
    println!("{}\n", describe(&annotations, &mut config)?);

    config.bind_from(&annotations)?;
    println!("{config:#?}");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
