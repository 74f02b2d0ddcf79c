//! CSV export for prospected company result sets.

use chrono::NaiveDate;

use crate::domain::lead::Company;

const HEADERS: [&str; 9] =
    ["Nome", "CNPJ", "Endereço", "Cidade", "Estado", "Telefone", "Email", "Website", "Setor"];

/// Render a company result set as CSV. Every cell is quoted; embedded quotes
/// are doubled so spreadsheet imports survive arbitrary company names.
pub fn companies_csv(companies: &[Company]) -> String {
    let mut rows = Vec::with_capacity(companies.len() + 1);
    rows.push(csv_row(HEADERS.iter().copied()));

    for company in companies {
        rows.push(csv_row(
            [
                company.name.as_str(),
                company.cnpj.as_str(),
                company.address.as_str(),
                company.city.as_str(),
                company.state.as_str(),
                company.phone.as_deref().unwrap_or(""),
                company.email.as_deref().unwrap_or(""),
                company.website.as_deref().unwrap_or(""),
                company.sector.as_str(),
            ]
            .into_iter(),
        ));
    }

    rows.join("\n")
}

/// Download filename for an export: `leads_{sector}_{YYYY-MM-DD}.csv`.
pub fn export_filename(sector: &str, date: NaiveDate) -> String {
    format!("leads_{}_{}.csv", sector, date.format("%Y-%m-%d"))
}

fn csv_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    cells.map(quote_cell).collect::<Vec<_>>().join(",")
}

fn quote_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}
