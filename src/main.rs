use clap::Parser;
use std::io::Read;
use std::time::Duration;
use whatsapp_orders::adapters::catalog_from_config;
use whatsapp_orders::config::Command;
use whatsapp_orders::core::{CartItem, CatalogSource, CustomerInfo};
use whatsapp_orders::utils::error::ErrorSeverity;
use whatsapp_orders::utils::{logger, validation::validate_url, validation::Validate};
use whatsapp_orders::{
    parse_order, Cart, CliConfig, HttpCatalog, JsonFileCatalog, OrderError, OrderIntake,
    OrderMessageBuilder, ProductMatcher, Result, StoreConfig,
};

const CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting whatsapp-orders CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match load_store_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 目錄暫時無法取得，可重試
            ErrorSeverity::High => 1,     // 輸入或設定錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn load_store_config(path: Option<&str>) -> Result<StoreConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            StoreConfig::from_file(path)?
        }
        None => StoreConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(input)?)
}

async fn run(command: Command, config: StoreConfig) -> Result<()> {
    match command {
        Command::Parse { input, catalog } => {
            let text = read_input(&input)?;
            let parsed = parse_order(&text);
            if parsed.line_items.is_empty() {
                tracing::warn!("⚠️ {}", OrderError::NoProductsFound.user_friendly_message());
            }

            let output = match catalog {
                Some(path) => {
                    let products = JsonFileCatalog::new(path).load().await?;
                    let resolved = ProductMatcher::with_tuning(&products, config.match_tuning())
                        .resolve_all(&parsed.line_items);
                    serde_json::json!({ "order": parsed, "resolved": resolved })
                }
                None => serde_json::to_value(&parsed)?,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Draft {
            input,
            catalog,
            catalog_url,
            token,
            csv,
        } => {
            let text = read_input(&input)?;

            // 命令列參數優先於設定檔
            let source: Box<dyn CatalogSource> = match (catalog, catalog_url) {
                (Some(path), _) => Box::new(JsonFileCatalog::new(path)),
                (None, Some(url)) => {
                    validate_url("--catalog-url", &url)?;
                    Box::new(HttpCatalog::new(url, token, CATALOG_TIMEOUT)?)
                }
                (None, None) => {
                    let catalog_config =
                        config
                            .catalog
                            .as_ref()
                            .ok_or_else(|| OrderError::MissingConfigError {
                                field: "catalog (use --catalog, --catalog-url or [catalog])"
                                    .to_string(),
                            })?;
                    catalog_from_config(catalog_config)?
                }
            };

            let intake = OrderIntake::with_tuning(source, config.match_tuning());
            let draft = intake.process(&text).await?;

            for line in draft.unmatched() {
                eprintln!("⚠️ Sin coincidencia en el catálogo: {}", line.resolved_name);
            }
            println!("{}", serde_json::to_string_pretty(&draft)?);

            if let Some(csv_path) = csv {
                let file = std::fs::File::create(&csv_path)?;
                draft.write_csv(file)?;
                tracing::info!("📁 Lines exported to: {}", csv_path);
            }
        }

        Command::Message {
            cart,
            name,
            phone,
            address,
            notes,
        } => {
            let items: Vec<CartItem> = serde_json::from_str(&read_input(&cart)?)?;
            let mut cart = Cart::from_items(items);

            if let Some(catalog_config) = &config.catalog {
                let products = catalog_from_config(catalog_config)?.load().await?;
                if cart.reconcile_ids(&products) {
                    tracing::info!("🔧 Cart product ids updated from current catalog");
                }
            }

            let customer = CustomerInfo {
                name,
                phone,
                address,
                notes,
            };
            let builder = OrderMessageBuilder::new(config);
            let message = builder.build(&customer, &cart)?;
            let link = builder.link(&message)?;

            println!("{}\n\n{}", message, link);
        }
    }

    Ok(())
}
