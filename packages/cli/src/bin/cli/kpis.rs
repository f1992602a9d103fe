// ABOUTME: KPI dashboard command: counters and aggregate tables
// ABOUTME: Admin viewers additionally get the per-plant breakdowns

use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};

use llc_cli::Config;
use llc_dashboard::DashboardView;

use super::utils::{signed_in_client, CliResult};

fn small_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub async fn show_kpis(query: Option<&str>, config: &Config) -> CliResult {
    let (client, _store, user) = signed_in_client(config).await?;

    let records = client.list_records(None).await?;
    let view = DashboardView::compute(&records, query.unwrap_or(""), &user);

    println!("{}", "KPIs".blue().bold());
    if let Some(q) = query {
        println!("Filter: {}", q.cyan());
    }
    println!();
    println!("Total accumulated LLC: {}", view.total.to_string().cyan());
    println!("LLC deployed:          {}", view.deployed_total.to_string().cyan());
    println!(
        "LLC in preparation:    {}",
        view.in_preparation_total.to_string().cyan()
    );

    println!();
    println!("{}", "Status distribution".bold());
    let mut table = small_table(vec!["Status", "Records"]);
    for (status, count) in &view.status_distribution {
        table.add_row(vec![status.label().to_string(), count.to_string()]);
    }
    println!("{table}");

    println!();
    println!("{}", "Monthly generated LLC".bold());
    if view.monthly.is_empty() {
        println!("{}", "No dated records".dimmed());
    } else {
        let mut table = small_table(vec!["Month", "Records"]);
        for (bucket, count) in &view.monthly {
            table.add_row(vec![bucket.label(), count.to_string()]);
        }
        println!("{table}");
    }

    let Some(charts) = view.admin else {
        return Ok(());
    };

    println!();
    println!("{}", "Accumulated LLC deployed per plant".bold());
    let mut table = small_table(vec!["Plant", "Deployed"]);
    for (plant, count) in &charts.deployed_per_plant {
        table.add_row(vec![plant.clone(), count.to_string()]);
    }
    println!("{table}");

    println!();
    println!("{}", "Monthly LLC deployed per plant".bold());
    if charts.monthly_deployed_per_plant.is_empty() {
        println!("{}", "No deployed data".dimmed());
    } else {
        let mut header = vec!["Month".to_string()];
        header.extend(charts.plants.iter().cloned());
        let mut table = small_table(header.iter().map(String::as_str).collect());
        for row in &charts.monthly_deployed_per_plant {
            let mut cells = vec![row.bucket.label()];
            for plant in &charts.plants {
                cells.push(row.counts.get(plant).copied().unwrap_or(0).to_string());
            }
            table.add_row(cells);
        }
        println!("{table}");
    }

    println!();
    println!("{}", "Status per plant".bold());
    let mut header = vec!["Plant".to_string()];
    if let Some((_, first)) = charts.status_per_plant.first() {
        header.extend(first.iter().map(|(s, _)| s.label().to_string()));
    }
    let mut table = small_table(header.iter().map(String::as_str).collect());
    for (plant, counts) in &charts.status_per_plant {
        let mut cells = vec![plant.clone()];
        cells.extend(counts.iter().map(|(_, n)| n.to_string()));
        table.add_row(cells);
    }
    println!("{table}");

    Ok(())
}
