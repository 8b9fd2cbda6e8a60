use admin_console::core::breadcrumbs;
use admin_console::core::export::export_table;
use admin_console::core::modal::{ModalOptions, ModalProps, ModalSize, ModalStore};
use admin_console::core::order_form::OrderDraft;
use admin_console::core::table::{Column, DataTable, TableRow, TableView, ViewRow};
use admin_console::core::wizard::WizardStep;
use admin_console::core::{CallOrderBackend, ConfigProvider, Record, Resource};
use admin_console::domain::model::Buyer;
use admin_console::utils::error::{AdminError, ErrorSeverity};
use admin_console::utils::{logger, validation::Validate};
use admin_console::{
    ApiClient, CallOrderWizard, CliConfig, Command, ListQuery, LocalStorage, NotificationCenter,
    TomlConfig,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting admin-console");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let file_config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let outcome = match &file_config {
        Some(config) => run(cli.command.clone(), config).await,
        None => run(cli.command.clone(), &cli).await,
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        let mut toasts = NotificationCenter::default();
        toasts.from_error(&e);
        for toast in toasts.toasts() {
            eprintln!("❌ {}: {}", toast.title, toast.message);
        }
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(command: Command, config: &C) -> Result<(), AdminError> {
    config.validate()?;
    let client = ApiClient::from_config(config)?;

    match command {
        Command::List {
            resource,
            search,
            page,
            per_page,
            filter,
            export,
        } => {
            list_resource(&client, config, resource, search, page, per_page, filter, export).await
        }
        Command::Buyers { query } => search_buyers(&client, config, &query).await,
        Command::CallOrder {
            query,
            pick,
            product,
            quantity,
            unit_price,
            address,
            notes,
        } => {
            let draft = OrderDraft {
                product_id: product,
                quantity,
                unit_price,
                delivery_address: address,
                notes,
            };
            enter_call_order(client, config, &query, pick, draft).await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn list_resource<C: ConfigProvider>(
    client: &ApiClient,
    config: &C,
    resource: Resource,
    search: Option<String>,
    page: u32,
    per_page: Option<u32>,
    filter: Option<String>,
    export: Option<String>,
) -> Result<(), AdminError> {
    print_breadcrumbs(config, &format!("/{}", resource));

    let query = ListQuery {
        page: Some(page),
        per_page: per_page.or(Some(config.page_size() as u32)),
        search,
    };
    let fetched = client.list(resource, &query).await?;

    let mut table = DataTable::new(record_columns(&fetched.rows))
        .with_page_size(config.page_size())
        .with_debounce(config.filter_debounce());
    table.set_rows(fetched.rows);
    if let Some(text) = &filter {
        table.set_filter(text);
    }

    print_view(&table.view());
    if let Some(p) = &fetched.pagination {
        println!("Server page {} of {} ({} total)", p.page, p.total_pages, p.total);
    }

    if let Some(file_name) = export {
        let mut modals = ModalStore::new();
        let progress = modals.open(
            ModalProps::ExportProgress {
                resource,
                done: false,
            },
            ModalOptions {
                size: ModalSize::Sm,
                dismissible: false,
            },
        );

        let storage = LocalStorage::new(config.export_dir().to_string());
        let written = export_table(&storage, &file_name, &table).await?;

        modals.update(progress, |props| {
            if let ModalProps::ExportProgress { done, .. } = props {
                *done = true;
            }
        });
        modals.close(progress);
        println!(
            "📁 Exported {} rows to {}/{}",
            written,
            config.export_dir(),
            file_name
        );
    }

    Ok(())
}

async fn search_buyers<C: ConfigProvider>(
    client: &ApiClient,
    config: &C,
    query: &str,
) -> Result<(), AdminError> {
    print_breadcrumbs(config, "/call-orders/new/search");

    let buyers = client.search_buyers(query).await?;
    let mut table = DataTable::new(buyer_columns()).with_page_size(config.page_size());
    table.set_rows(buyers);
    print_view(&table.view());
    Ok(())
}

async fn enter_call_order<C: ConfigProvider>(
    client: ApiClient,
    config: &C,
    query: &str,
    pick: usize,
    draft: OrderDraft,
) -> Result<(), AdminError> {
    let mut wizard = CallOrderWizard::new(client);
    let mut toasts = NotificationCenter::new(config.toast_capacity());

    print_breadcrumbs(config, "/call-orders/new");
    announce(wizard.step());

    let found = wizard.search(query).await?;
    if found == 0 {
        println!("{}", admin_console::core::table::EMPTY_MESSAGE);
        return Ok(());
    }
    if let WizardStep::SearchCustomer { search, .. } = wizard.step() {
        for (i, buyer) in search.results.iter().enumerate() {
            println!("  [{}] {} ({})", i, buyer.name, buyer.phone);
        }
    }

    wizard.select_customer(pick)?;
    announce(wizard.step());
    wizard.confirm_customer()?;
    announce(wizard.step());

    if let Err(e) = wizard.submit_details(draft) {
        if let WizardStep::EnterOrderDetails { errors, .. } = wizard.step() {
            for (field, message) in errors.iter() {
                eprintln!("  ✗ {}: {}", field, message);
            }
        }
        return Err(e);
    }
    announce(wizard.step());
    if let WizardStep::ReviewAndSubmit {
        customer, order, ..
    } = wizard.step()
    {
        println!(
            "  {} x {} @ {:.2} = {:.2} for {}",
            order.quantity,
            order.product_id,
            order.unit_price,
            order.total(),
            customer.name
        );
    }

    let created = wizard.submit().await?;
    toasts.success(&format!("Call order {} created", created.id));
    for toast in toasts.toasts() {
        println!("✅ {}", toast.message);
    }
    announce(wizard.step());
    Ok(())
}

fn announce(step: &WizardStep) {
    tracing::info!("Step {}/4: {}", step.number(), step.name());
    println!("▶ Step {}/4: {}", step.number(), step.name());
}

fn print_breadcrumbs<C: ConfigProvider>(config: &C, path: &str) {
    let trail = breadcrumbs::truncate(&breadcrumbs::from_path(path), config.breadcrumb_max_items());
    let labels: Vec<&str> = trail.iter().map(|c| c.label.as_str()).collect();
    println!("{}", labels.join(" / "));
}

/// Columns for untyped rows: `id` first, the rest alphabetically, all searchable.
fn record_columns(rows: &[Record]) -> Vec<Column<Record>> {
    let mut keys: Vec<&String> = rows
        .iter()
        .flat_map(|r| r.data.keys())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    keys.sort_by_key(|k| k.as_str() != "id");

    keys.into_iter()
        .map(|key| Column::field(key, key).searchable())
        .collect()
}

fn buyer_columns() -> Vec<Column<Buyer>> {
    vec![
        Column::new("id", "ID", |b: &Buyer| b.row_id()),
        Column::new("name", "Name", |b: &Buyer| b.name.clone()).searchable(),
        Column::new("phone", "Phone", |b: &Buyer| b.phone.clone()).searchable(),
        Column::new("region", "Region", |b: &Buyer| b.region.clone().unwrap_or_default()),
    ]
}

fn print_view(view: &TableView) {
    println!("{}", view.headers.join(" | "));
    for row in &view.rows {
        match row {
            ViewRow::Placeholder { cells } => println!("{}", vec!["…"; *cells].join(" | ")),
            ViewRow::Data {
                cells, selected, ..
            } => {
                let marker = if *selected { "*" } else { " " };
                println!("{}{}", marker, cells.join(" | "));
            }
            ViewRow::Detail { content, .. } => {
                for line in content.lines() {
                    println!("    {}", line);
                }
            }
            ViewRow::Empty { message, .. } => println!("{}", message),
        }
    }
    println!("Page {} of {}", view.page_index + 1, view.page_count);
}
