// Command-line front end for the dashboard engine.
//
// The binary plays the part of the UI layer: it owns the filter, sort and
// search state (taken from the command line), generates the dataset once,
// and prints whichever panel was asked for.
use chrono::{Datelike, Local};
use clap::{Args, Parser, Subcommand};
use pe_crime_dashboard::dashboard;
use pe_crime_dashboard::export::{default_export_filename, export_rows, write_export};
use pe_crime_dashboard::kpi::calculate_kpis;
use pe_crime_dashboard::map::map_markers;
use pe_crime_dashboard::municipality::{build_table, SortConfig, SortDirection, SortKey, TableRequest};
use pe_crime_dashboard::output;
use pe_crime_dashboard::reference::{self, MUNICIPALITIES};
use pe_crime_dashboard::timeseries::{build_time_series, PeriodAxis};
use pe_crime_dashboard::util::format_int;
use pe_crime_dashboard::{filter_records, DatasetGenerator, FilterCriteria, RawFilter};

#[derive(Parser)]
#[command(name = "pe_crime_dashboard", about = "Crime incidence dashboard for Pernambuco (simulated data)")]
struct Cli {
    /// Seed for the synthetic dataset; random when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Last year of the three-year window; defaults to the current year
    #[arg(long, global = true)]
    current_year: Option<i32>,

    #[command(flatten)]
    filter: FilterArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Filter fields as free text. Anything unparseable means "no constraint".
#[derive(Args)]
struct FilterArgs {
    #[arg(long, global = true, default_value = "")]
    year: String,
    #[arg(long, global = true, default_value = "")]
    month: String,
    #[arg(long, global = true, default_value = "all")]
    crime_type: String,
    #[arg(long, global = true, default_value = "all")]
    municipality: String,
}

#[derive(Args)]
struct TableArgs {
    /// Case-insensitive municipality name filter
    #[arg(long, default_value = "")]
    search: String,
    /// name, population, totalCases, rate or a crime type id
    #[arg(long, default_value = "totalCases")]
    sort: String,
    #[arg(long, default_value = "desc")]
    direction: String,
    /// Number of rows to print
    #[arg(long, default_value_t = 15)]
    rows: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the KPI cards
    Kpis,
    /// Print the ranked municipality table
    Table(TableArgs),
    /// Print the dense monthly series per crime type
    Timeseries,
    /// Print map marker intensities
    Map,
    /// Write the filtered records as CSV
    Export {
        /// Output path; defaults to violencia_pe_<today>.csv
        #[arg(long)]
        output: Option<String>,
        /// Rows to preview on the console
        #[arg(long, default_value_t = 3)]
        preview: usize,
    },
    /// Write every panel as JSON
    Summary {
        #[command(flatten)]
        table: TableArgs,
        #[arg(long, default_value = "dashboard_summary.json")]
        output: String,
    },
}

fn table_request(args: &TableArgs) -> Result<TableRequest, Box<dyn std::error::Error>> {
    let sort = SortConfig {
        key: args.sort.parse::<SortKey>()?,
        direction: args.direction.parse::<SortDirection>()?,
    };
    Ok(TableRequest {
        search: args.search.clone(),
        sort,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let today = Local::now().date_naive();
    let current_year = cli.current_year.unwrap_or_else(|| today.year());

    let mut generator = DatasetGenerator::new(current_year);
    if let Some(seed) = cli.seed {
        generator = generator.with_seed(seed);
    }
    let dataset = generator.generate();
    if dataset.is_empty() {
        log::warn!("Generated dataset has no records");
    }

    let criteria = FilterCriteria::from_raw(&RawFilter {
        year: cli.filter.year,
        month: cli.filter.month,
        crime_type: cli.filter.crime_type,
        municipality: cli.filter.municipality,
    });
    let filtered = filter_records(dataset.records(), &criteria);
    log::info!(
        "{} of {} records match the filters",
        format_int(filtered.len()),
        format_int(dataset.len())
    );

    println!("Dashboard de Incidência de Violência");
    println!("Estado de Pernambuco (Dados Simulados)\n");

    match cli.command {
        Commands::Kpis => {
            let kpis = calculate_kpis(&filtered, MUNICIPALITIES);
            println!("{}\n", output::render_kpis(&kpis));
        }
        Commands::Table(args) => {
            let request = table_request(&args)?;
            let table = build_table(&filtered, MUNICIPALITIES, &request)?;
            println!("Dados por Município\n");
            println!("{}\n", output::render_municipality_rows(&table.rows, args.rows));
            println!(
                "Mostrando {} de {} municípios",
                table.rows.len(),
                table.total_municipalities
            );
        }
        Commands::Timeseries => {
            let axis = PeriodAxis::from_criteria(&criteria, current_year);
            let points = build_time_series(&filtered, &axis);
            println!("Evolução Temporal por Tipo de Crime");
            println!("({})\n", reference::window_caption(criteria.year, criteria.month));
            println!("{}\n", output::render_time_series(&points));
        }
        Commands::Map => {
            let markers = map_markers(&filtered, MUNICIPALITIES, criteria.crime_type)?;
            println!("Mapa de Incidência por Município\n");
            println!("{}\n", output::render_markers(&markers));
        }
        Commands::Export { output: path, preview } => {
            let path = path.unwrap_or_else(|| default_export_filename(today));
            write_export(&path, &filtered, MUNICIPALITIES)?;
            let rows = export_rows(&filtered, MUNICIPALITIES)?;
            println!("{}\n", output::render_rows(&rows, preview));
            println!("(Full table exported to {})", path);
        }
        Commands::Summary { table, output: path } => {
            let request = table_request(&table)?;
            let snapshot =
                dashboard::snapshot(dataset.records(), MUNICIPALITIES, &criteria, &request, current_year)?;
            output::write_json(&path, &snapshot)?;
            println!(
                "Summary written to {} ({} records, {} total cases)",
                path,
                format_int(snapshot.record_count),
                format_int(snapshot.kpis.total_cases)
            );
        }
    }

    Ok(())
}
