use super::domain::Contractor;

const GENERALIST_VERTICAL: &str = "handyman";

/// Adjacent trades that can bid on a project outside their own vertical.
const ADJACENT_TRADES: &[(&str, &str)] = &[("roofing", "siding")];

/// Keep contractors able to take on `project_type`, preserving input order.
pub fn filter_relevant<'a>(contractors: &'a [Contractor], project_type: &str) -> Vec<&'a Contractor> {
    contractors
        .iter()
        .filter(|contractor| is_relevant(contractor, project_type))
        .collect()
}

pub fn is_relevant(contractor: &Contractor, project_type: &str) -> bool {
    let vertical = contractor.vertical.as_str();
    vertical == project_type
        || vertical == GENERALIST_VERTICAL
        || ADJACENT_TRADES
            .iter()
            .any(|(project, trade)| *project == project_type && *trade == vertical)
}
