//! Command-line front-end: argument definitions and the commands behind them.

use clap::{Parser, Subcommand};
use eyre::{eyre, Result, WrapErr};
use log::{debug, info};
use std::{fs, path::PathBuf};
use svd_view::{
    export,
    layout::{DrawPlan, LayoutConfig},
    Config, Device, Register, Session,
};

/// Browse the peripherals and registers of a CMSIS-SVD file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the SVD file
    pub input: PathBuf,

    /// Let `derivedFrom` peripherals inherit the registers they lack
    #[arg(long)]
    pub derived: bool,

    /// Path to a layout configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// What to print
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Device, peripheral and register tree (default)
    Tree,
    /// Plain-text register tables, one per peripheral
    Export,
    /// Bit diagram draw plan of a register
    Layout {
        /// Register name
        register: String,
        /// Peripheral to look the register up in
        #[arg(short, long)]
        peripheral: Option<String>,
        /// Available width in pixels
        #[arg(short, long, default_value_t = 340.0)]
        width: f32,
    },
    /// Details of one field of a register
    Field {
        /// Register name
        register: String,
        /// Field name
        field: String,
        /// Peripheral to look the register up in
        #[arg(short, long)]
        peripheral: Option<String>,
    },
}

/// Runs the command selected by `args`.
pub fn run(args: &Args) -> Result<()> {
    let layout = load_layout_config(args.config.as_ref())?;
    let mut config = Config::new();
    config.inherit_derived(args.derived);
    let mut session = Session::with_config(config, layout);

    let document = fs::read(&args.input)
        .wrap_err_with(|| format!("failed to read {}", args.input.display()))?;
    session
        .load(&document)
        .wrap_err_with(|| format!("failed to load {}", args.input.display()))?;

    match args.command.as_ref().unwrap_or(&Command::Tree) {
        Command::Tree => {
            let device = session.device().ok_or_else(|| eyre!("no device loaded"))?;
            print!("{}", tree(device));
        }
        Command::Export => {
            let device = session.device().ok_or_else(|| eyre!("no device loaded"))?;
            print!("{}", export::to_text(device));
        }
        Command::Layout { register, peripheral, width } => {
            select(&mut session, peripheral.as_deref(), register)?;
            let (_, selected) = session.selected().ok_or_else(|| eyre!("no register selected"))?;
            match session.diagram(*width) {
                Some(plan) => print!("{}", describe_plan(selected, &plan)),
                None => println!("{} has no fields to draw", selected.name),
            }
        }
        Command::Field { register, field, peripheral } => {
            select(&mut session, peripheral.as_deref(), register)?;
            let (_, selected) = session.selected().ok_or_else(|| eyre!("no register selected"))?;
            let (id, _) = selected
                .field_by_name(field)
                .ok_or_else(|| eyre!("field `{field}` not found in `{}`", selected.name))?;
            let detail = session.field_detail(id).ok_or_else(|| eyre!("field `{field}` vanished"))?;
            print!("{detail}");
            println!();
            println!("Register: {}", selected.name);
            println!("Address: {}", selected.address_hex());
        }
    }
    Ok(())
}

fn load_layout_config(path: Option<&PathBuf>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        debug!("No layout configuration file given, using defaults");
        return Ok(LayoutConfig::default());
    };
    let source = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    let config = toml::from_str(&source)
        .wrap_err_with(|| format!("invalid layout configuration in {}", path.display()))?;
    info!(path = path.display().to_string(); "Loaded layout configuration");
    Ok(config)
}

fn select(session: &mut Session, peripheral: Option<&str>, register: &str) -> Result<()> {
    let found = match peripheral {
        Some(peripheral) => session.select_in(peripheral, register).is_some(),
        None => session.select(register).is_some(),
    };
    if found {
        Ok(())
    } else {
        Err(eyre!("register `{register}` not found"))
    }
}

fn tree(device: &Device) -> String {
    let mut out = device.name.clone();
    if !device.vendor.is_empty() {
        out.push_str(&format!(" ({})", device.vendor));
    }
    out.push('\n');
    let peripherals = device.peripherals();
    for (i, peripheral) in peripherals.iter().enumerate() {
        let last_periph = i + 1 == peripherals.len();
        out.push_str(&format!(
            "{} {:<22} {} {:>4} registers  {}\n",
            if last_periph { "└─" } else { "├─" },
            peripheral.name,
            peripheral.base_address_hex(),
            peripheral.registers().len(),
            preview(&peripheral.description, 50),
        ));
        let registers = peripheral.registers();
        for (j, register) in registers.iter().enumerate() {
            out.push_str(&format!(
                "{}  {} {:<20} @ {} {:>3} bits  {}\n",
                if last_periph { " " } else { "│" },
                if j + 1 == registers.len() { "└─" } else { "├─" },
                register.name,
                register.address_hex(),
                register.size,
                preview(&register.description, 30),
            ));
        }
    }
    out
}

fn describe_plan(register: &Register, plan: &DrawPlan) -> String {
    let mut out = format!(
        "{} @ {}, {} bits, {} fields, {:.1}x{:.1}\n",
        register.name,
        register.address_hex(),
        register.size,
        register.fields().len(),
        plan.width(),
        plan.height(),
    );
    for primitive in plan.primitives() {
        out.push_str(&primitive.to_string());
        out.push('\n');
    }
    out
}

fn preview(text: &str, limit: usize) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").chars().take(limit).collect()
}
