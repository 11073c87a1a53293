// Mon Oct 19 2026 - Alex

use super::args::{Args, CallArgs, Command, PrintArgs};
use crate::config::Config;
use crate::decode::DecodeContext;
use crate::host::{MethodRegistry, PrinterRegistry};
use crate::memory::MmapMemory;
use crate::output::{to_json, write_json, BitsetStyle, Presenter, TreeFormatter, ValueNode};
use crate::synthetic::{MethodArg, MethodKind, SyntheticValue};
use crate::types::{TypeProvider, TypeRegistry};
use crate::utils::{self, logging};
use anyhow::{anyhow, Context};
use colored::Colorize;

/// The image and type catalog a query runs against.
struct Session {
    memory: MmapMemory,
    types: TypeRegistry,
}

impl Session {
    fn open(config: &Config) -> anyhow::Result<Self> {
        config.validate().map_err(|e| anyhow!(e))?;
        let (Some(image), Some(catalog)) = (&config.image, &config.catalog) else {
            return Err(anyhow!("An image and a type catalog are required"));
        };
        let memory = MmapMemory::from_file(image, config.base_address)
            .with_context(|| format!("Failed to map image {}", image.display()))?;
        let types =
            TypeRegistry::load(catalog).with_context(|| format!("Failed to load type catalog {}", catalog.display()))?;
        log::info!("{} mapped at {} with {} types", image.display(), config.base_address, types.len());
        Ok(Self { memory, types })
    }

    fn context(&self) -> DecodeContext<'_> {
        DecodeContext::new(&self.memory, &self.types)
    }
}

pub struct CommandHandler {
    printers: PrinterRegistry,
    methods: MethodRegistry,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            printers: PrinterRegistry::with_defaults(),
            methods: MethodRegistry::with_defaults(),
        }
    }

    pub fn with_registries(printers: PrinterRegistry, methods: MethodRegistry) -> Self {
        Self { printers, methods }
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        let config = self.load_config(&args)?;
        self.setup_logging(&config)?;
        if !config.use_color {
            colored::control::set_override(false);
        }

        match args.command {
            Command::Print(print_args) => self.handle_print(config, print_args),
            Command::Call(call_args) => self.handle_call(&config, call_args),
            Command::Printers => self.handle_printers(&config),
        }
    }

    /// Config file first, then command line flags on top.
    fn load_config(&self, args: &Args) -> anyhow::Result<Config> {
        let mut config = match &args.config {
            Some(path) => Config::load(path).map_err(|e| anyhow!(e))?,
            None => Config::default(),
        };
        if let Some(image) = &args.image {
            config = config.with_image(image.clone());
        }
        if let Some(base) = args.base {
            config = config.with_base_address(base);
        }
        if let Some(catalog) = &args.catalog {
            config = config.with_catalog(catalog.clone());
        }
        if let Some(level) = &args.log_level {
            config = config.with_log_level(level);
        }
        if args.json {
            config = config.with_json_output(true);
        }
        if let Some(output) = &args.output {
            config = config.with_output(output.clone());
        }
        if args.no_color {
            config = config.with_color(false);
        }
        Ok(config)
    }

    fn setup_logging(&self, config: &Config) -> anyhow::Result<()> {
        let level = logging::level_from_str(&config.log_level)
            .ok_or_else(|| anyhow!("Unknown log level: {}", config.log_level))?;
        logging::init_logger(level);
        Ok(())
    }

    fn handle_print(&self, mut config: Config, args: PrintArgs) -> anyhow::Result<()> {
        if let Some(depth) = args.max_depth {
            config = config.with_max_depth(depth);
        }
        if let Some(max) = args.max_children {
            config = config.with_max_children(max);
        }
        if args.sparse {
            config = config.with_bitset_style(BitsetStyle::Sparse);
        }
        if args.keep_nul {
            config.truncate_at_nul = false;
        }
        if args.addresses {
            config.show_addresses = true;
        }

        let session = Session::open(&config)?;
        let ty = session.types.require(&args.type_name)?;
        let _timer = utils::scoped_timer(&format!("print {}", ty.name));

        let node = Presenter::new(session.context(), &self.printers)
            .with_options(config.presenter_options())
            .present("value", args.address, &ty)
            .with_context(|| format!("Cannot read {} at {}", ty.name, args.address))?;
        self.emit(&config, &node)
    }

    fn handle_call(&self, config: &Config, args: CallArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow!(e))?;
        let session = Session::open(config)?;
        let ctx = session.context();
        let ty = session.types.require(&args.type_name)?;
        let _timer = utils::scoped_timer(&format!("{}::{}", ty.name, args.method));

        let arg = match (&args.arg, args.method.parse::<MethodKind>()) {
            (Some(text), Ok(kind)) => Some(MethodArg::parse_for(kind, text).map_err(|e| anyhow!(e))?),
            (Some(text), Err(_)) => Some(MethodArg::key(text)),
            (None, _) => None,
        };
        let result = self
            .methods
            .call(&ctx, args.address, &ty, &args.method, arg.as_ref())
            .with_context(|| format!("{} failed on {} at {}", args.method, ty.name, args.address))?;

        let label = match &args.arg {
            Some(text) => format!("{}({})", args.method, text),
            None => format!("{}()", args.method),
        };
        let node = match result {
            SyntheticValue::Element { ty, address } => Presenter::new(ctx, &self.printers)
                .with_options(config.presenter_options())
                .present(&label, address, &ty)?,
            other => ValueNode::new(&label, "").with_summary(other.to_string()),
        };
        self.emit(config, &node)
    }

    fn handle_printers(&self, config: &Config) -> anyhow::Result<()> {
        if config.json_output {
            let listing: Vec<serde_json::Value> = self
                .printers
                .entries()
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "matcher": p.matcher.to_string(),
                        "description": p.description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
            return Ok(());
        }

        println!(
            "{}",
            utils::pluralize(self.printers.len(), "printer", "printers").cyan().bold()
        );
        for printer in self.printers.entries() {
            println!("  {} {} {}", printer.name.green(), printer.matcher.to_string().yellow(), printer.description);
        }
        println!();
        println!("{}", utils::pluralize(self.methods.len(), "method", "methods").cyan().bold());
        for method in self.methods.entries() {
            println!("  {} {}", method.matcher.to_string().yellow(), method.help_text());
        }
        Ok(())
    }

    fn emit(&self, config: &Config, node: &ValueNode) -> anyhow::Result<()> {
        if config.json_output {
            println!("{}", to_json(node, true)?);
        } else {
            let formatter = TreeFormatter::new()
                .with_color(config.use_color)
                .with_addresses(config.show_addresses);
            println!("{}", formatter.format(node));
        }
        if let Some(path) = &config.output {
            write_json(node, path).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        for error in node.errors() {
            log::warn!("{}", error);
        }
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}
