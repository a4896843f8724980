use crate::cli::commands::Session;
use crate::cli::parser::{Cli, Commands, ReportAction};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::photo::Photo;
use crate::models::report::{JarCounts, ProductCounts, ProductionReport, ReportPayload};
use crate::ui::messages::{info, success};
use crate::utils::time::parse_optional_time;
use std::path::Path;

pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Report { action } = &cli.command else {
        return Ok(());
    };

    let session = Session::open(cli, cfg)?;
    let svc = session.lead_reports();

    match action {
        ReportAction::Submit {
            product_a_small,
            product_a_medium,
            product_b_small,
            product_b_medium,
            jars_small,
            jars_medium,
            jar_photo,
            distributor_start,
            sales_start,
        } => {
            let payload = ReportPayload {
                products: ProductCounts {
                    product_a_small: *product_a_small,
                    product_a_medium: *product_a_medium,
                    product_b_small: *product_b_small,
                    product_b_medium: *product_b_medium,
                },
                jars: JarCounts {
                    small: *jars_small,
                    medium: *jars_medium,
                },
                jar_photo: jar_photo
                    .as_ref()
                    .map(|p| Photo::from_file(Path::new(p)))
                    .transpose()?,
                distributor_start: parse_optional_time(distributor_start.as_ref())?,
                sales_start: parse_optional_time(sales_start.as_ref())?,
            };

            let report = svc.submit_report(&payload)?;
            success(format!(
                "Report saved for {} ({} units).",
                report.date,
                payload.products.total()
            ));
        }
        ReportAction::Show { json } => match svc.today_report()? {
            None => info("No report for today yet."),
            Some(r) if *json => {
                let text =
                    serde_json::to_string_pretty(&r).map_err(|e| AppError::Other(e.to_string()))?;
                println!("{}", text);
            }
            Some(r) => print_report(&r),
        },
    }
    Ok(())
}

fn print_report(r: &ProductionReport) {
    println!("📦 Production report {} (lead {})", r.date, r.lead_employee_id);
    match &r.products {
        Some(p) => {
            println!("   product A : {} small / {} medium", p.product_a_small, p.product_a_medium);
            println!("   product B : {} small / {} medium", p.product_b_small, p.product_b_medium);
        }
        None => println!("   products  : not submitted"),
    }
    println!("   jars      : {} small / {} medium", r.jars.small, r.jars.medium);
    if let Some(t) = r.distributor_start {
        println!("   distributor start : {}", t.format("%H:%M"));
    }
    if let Some(t) = r.sales_start {
        println!("   sales start       : {}", t.format("%H:%M"));
    }
    if let Some(photo) = &r.jar_photo_ref {
        println!("   jar photo : {}", photo);
    }
}
