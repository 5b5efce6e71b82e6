//! Writing a small network model as a versioned JSON document.
//!
//! Run with: cargo run --example network

use std::error::Error;
use treedata::{to_string_pretty, to_value, TreeDataWriter};

#[derive(Clone, Copy)]
enum EnergySource {
    Nuclear,
    Hydro,
}

impl AsRef<str> for EnergySource {
    fn as_ref(&self) -> &str {
        match self {
            EnergySource::Nuclear => "NUCLEAR",
            EnergySource::Hydro => "HYDRO",
        }
    }
}

struct Generator {
    id: &'static str,
    source: Option<EnergySource>,
    target_p: f64,
    target_q: f64,
    voltage_regulator_on: bool,
}

fn write_network<W: TreeDataWriter>(w: &mut W, generators: &[Generator]) -> treedata::Result<()> {
    w.set_extension_versions([("generatorStartup", "1.1"), ("activePowerControl", "1.2")])?;
    w.begin_node("iidm", "network")?;
    w.write_string_attribute("id", "demo")?;
    w.write_string_attribute("sourceFormat", "code")?;
    w.begin_group("generators")?;
    for generator in generators {
        w.begin_node("iidm", "generator")?;
        w.write_string_attribute("id", generator.id)?;
        w.write_enum_attribute("energySource", generator.source)?;
        w.write_double_attribute("targetP", generator.target_p)?;
        w.write_double_attribute("targetQ", generator.target_q)?;
        w.write_bool_attribute_or(
            "voltageRegulatorOn",
            generator.voltage_regulator_on,
            false,
        )?;
        w.end_node()?;
    }
    w.end_group()?;
    // No loads in this model: the field is left out entirely
    w.begin_group("loads")?;
    w.end_group()?;
    w.end_node()
}

fn main() -> Result<(), Box<dyn Error>> {
    let generators = [
        Generator {
            id: "GEN1",
            source: Some(EnergySource::Nuclear),
            target_p: 607.0,
            target_q: 301.0,
            voltage_regulator_on: true,
        },
        Generator {
            id: "GEN2",
            source: Some(EnergySource::Hydro),
            target_p: 120.5,
            target_q: f64::NAN,
            voltage_regulator_on: false,
        },
    ];

    let json = to_string_pretty("1.12", |w| write_network(w, &generators))?;
    println!("JSON output:\n{}\n", json);

    // Reading back applies the same defaults the writer elided
    let doc = to_value("1.12", |w| write_network(w, &generators))?;
    for generator in doc.members("generators") {
        let id = generator.get("id").and_then(|v| v.as_str()).unwrap_or("?");
        let target_q = generator.f64_or("targetQ", f64::NAN);
        let regulating = generator
            .get("voltageRegulatorOn")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        println!("{}: targetQ={} regulating={}", id, target_q, regulating);
    }
    println!("loads: {}", doc.members("loads").len());

    Ok(())
}
