// src/services/view_service.rs
//
// Derived view computation for the leads table: pure functions of
// (collection, schema, query) -> page, no hidden state, so every rule here
// is testable in isolation.

use std::cmp::Ordering;

use crate::models::column::{ColumnType, CustomColumn};
use crate::models::lead::Lead;
use crate::models::view::{LeadPage, LeadQuery, SortDirection};

const DEFAULT_PAGE_SIZE: usize = 25;

/// Search targets: canonical storage key plus the legacy display-cased key
/// older imports wrote into `custom_data`. Both sides of each pair are
/// checked.
const SEARCH_FIELDS: &[(&str, &str)] = &[
    ("websiteUrl", "Website URL"),
    ("companyName", "Company Name"),
    ("contactName", "Contact Name"),
    ("email", "Email"),
    ("category", "Category"),
    ("productName", "Product Name"),
];

/// Compute the exact rows the table shows: filter, sort, paginate.
pub fn compute(leads: &[Lead], columns: &[CustomColumn], query: &LeadQuery) -> LeadPage {
    let mut rows: Vec<&Lead> = leads.iter().filter(|l| matches(l, query)).collect();
    sort_rows(&mut rows, columns, query);

    let total_items = rows.len();
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let total_pages = total_items.div_ceil(page_size);
    let page = query.page.unwrap_or(1).max(1);
    let start_index = ((page - 1) * page_size).min(total_items);
    let end_index = (start_index + page_size).min(total_items);

    LeadPage {
        rows: rows[start_index..end_index].iter().map(|l| (*l).clone()).collect(),
        total_items,
        total_pages,
        page,
        start_index,
        end_index,
    }
}

fn matches(lead: &Lead, query: &LeadQuery) -> bool {
    if let Some(term) = query.search.as_deref() {
        let term = term.trim().to_lowercase();
        if !term.is_empty() {
            let hit = SEARCH_FIELDS.iter().any(|(canonical, legacy)| {
                field_text(lead, canonical, legacy)
                    .is_some_and(|v| v.to_lowercase().contains(&term))
            });
            if !hit {
                return false;
            }
        }
    }

    // Filters read through the same canonical-then-legacy lookup as search,
    // so values imported under display-cased keys stay filterable.
    filter_matches(query.status.as_deref(), &field_text(lead, "status", "Status"))
        && filter_matches(
            query.funding_type.as_deref(),
            &field_text(lead, "fundingType", "Funding Type"),
        )
        && filter_matches(query.category.as_deref(), &field_text(lead, "category", "Category"))
        && filter_matches(query.team_size.as_deref(), &field_text(lead, "teamSize", "Team Size"))
}

/// `None`, `""` and `"all"` mean "no constraint"; anything else must match
/// exactly.
fn filter_matches(filter: Option<&str>, value: &Option<String>) -> bool {
    match filter {
        None => true,
        Some(f) if f.is_empty() || f.eq_ignore_ascii_case("all") => true,
        Some(f) => value.as_deref() == Some(f),
    }
}

fn sort_rows(rows: &mut [&Lead], columns: &[CustomColumn], query: &LeadQuery) {
    let Some(field) = query.sort_field.as_deref() else {
        return;
    };
    let direction = query.sort_direction;

    // sort_by is stable, so equal keys keep insertion order.
    match field {
        // Preserved quirk: sorting the website column orders by recency,
        // not lexicographically, whatever direction was asked for.
        "websiteUrl" => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        "createdAt" => rows.sort_by(|a, b| {
            let ord = a.created_at.cmp(&b.created_at);
            apply_direction(ord, direction)
        }),
        "arr" => rows.sort_by(|a, b| cmp_nullable(&a.arr, &b.arr, direction)),
        "followUpDate" => {
            rows.sort_by(|a, b| cmp_nullable(&a.follow_up_date, &b.follow_up_date, direction))
        }
        "companyName" | "contactName" | "email" | "linkedinUrl" | "category" | "edition"
        | "productName" | "teamSize" | "fundingType" | "status" => rows.sort_by(|a, b| {
            cmp_nullable(
                &builtin_text(a, field).map(|s| s.to_lowercase()),
                &builtin_text(b, field).map(|s| s.to_lowercase()),
                direction,
            )
        }),
        key => {
            // Custom column: coerce per the column's declared type.
            let Some(column) = columns.iter().find(|c| c.field_key == key) else {
                return;
            };
            match column.column_type {
                ColumnType::Number => rows.sort_by(|a, b| {
                    cmp_nullable(
                        &a.custom_data.get(key).and_then(|v| v.as_f64()),
                        &b.custom_data.get(key).and_then(|v| v.as_f64()),
                        direction,
                    )
                }),
                _ => rows.sort_by(|a, b| {
                    cmp_nullable(
                        &custom_text(a, key).map(|s| s.to_lowercase()),
                        &custom_text(b, key).map(|s| s.to_lowercase()),
                        direction,
                    )
                }),
            }
        }
    }
}

/// Missing values sort last regardless of direction; the direction only
/// applies between two present values.
fn cmp_nullable<T: PartialOrd>(a: &Option<T>, b: &Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = x.partial_cmp(y).unwrap_or(Ordering::Equal);
            apply_direction(ord, direction)
        }
    }
}

fn apply_direction(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

fn status_label(lead: &Lead) -> String {
    // Statuses serialize to their display label, which is what filters
    // compare against.
    serde_json::to_value(lead.status)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn builtin_text(lead: &Lead, key: &str) -> Option<String> {
    match key {
        "websiteUrl" => Some(lead.website_url.clone()),
        "companyName" => lead.company_name.clone(),
        "contactName" => lead.contact_name.clone(),
        "email" => lead.email.clone(),
        "linkedinUrl" => lead.linkedin_url.clone(),
        "category" => lead.category.clone(),
        "edition" => lead.edition.clone(),
        "productName" => lead.product_name.clone(),
        "teamSize" => Some(lead.team_size.clone()),
        "fundingType" => Some(lead.funding_type.clone()),
        "status" => Some(status_label(lead)),
        _ => None,
    }
}

fn custom_text(lead: &Lead, key: &str) -> Option<String> {
    lead.custom_data
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn field_text(lead: &Lead, canonical: &str, legacy: &str) -> Option<String> {
    builtin_text(lead, canonical)
        .or_else(|| custom_text(lead, canonical))
        .or_else(|| custom_text(lead, legacy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::{Map, json};

    use crate::models::lead::LeadStatus;
    use crate::store::{ColumnRepository, Database};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, day, hour, 0, 0).unwrap()
    }

    fn lead(id: i64, url: &str) -> Lead {
        Lead {
            id,
            website_url: url.to_string(),
            company_name: None,
            contact_name: None,
            email: None,
            linkedin_url: None,
            category: None,
            team_size: "1-3".to_string(),
            arr: None,
            status: LeadStatus::NewLead,
            funding_type: "Bootstrapped".to_string(),
            follow_up_date: None,
            edition: None,
            product_name: None,
            custom_data: Map::new(),
            created_at: at(1, 0) + chrono::Duration::hours(id as i64),
        }
    }

    fn query() -> LeadQuery {
        LeadQuery::default()
    }

    #[test]
    fn pagination_slices_the_exact_window() {
        let leads: Vec<Lead> = (0..60)
            .map(|i| lead(i, &format!("https://co{i}.com")))
            .collect();
        let q = LeadQuery {
            page: Some(3),
            page_size: Some(25),
            ..query()
        };
        let page = compute(&leads, &[], &q);
        assert_eq!(page.total_items, 60);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.start_index, 50);
        assert_eq!(page.end_index, 60);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.rows[0].id, 50);
    }

    #[test]
    fn page_past_the_end_is_empty_but_well_formed() {
        let leads: Vec<Lead> = (0..5).map(|i| lead(i, &format!("https://c{i}.io"))).collect();
        let q = LeadQuery {
            page: Some(9),
            page_size: Some(25),
            ..query()
        };
        let page = compute(&leads, &[], &q);
        assert_eq!(page.rows.len(), 0);
        assert_eq!(page.start_index, 5);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn arr_sort_is_stable_for_equal_values_and_puts_nulls_last() {
        let mut a = lead(1, "https://a.com");
        a.arr = Some(100.0);
        let mut b = lead(2, "https://b.com");
        b.arr = Some(100.0);
        let c = lead(3, "https://c.com"); // arr: None
        let mut d = lead(4, "https://d.com");
        d.arr = Some(50.0);

        let q = LeadQuery {
            sort_field: Some("arr".into()),
            sort_direction: SortDirection::Asc,
            ..query()
        };
        let page = compute(&[a, b, c, d], &[], &q);
        let ids: Vec<i64> = page.rows.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![4, 1, 2, 3]);

        // Descending still leaves the null at the end.
        let q = LeadQuery {
            sort_field: Some("arr".into()),
            sort_direction: SortDirection::Desc,
            ..query()
        };
        let page = compute(&page.rows, &[], &q);
        let ids: Vec<i64> = page.rows.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 3]);
    }

    #[test]
    fn website_sort_orders_by_recency_instead() {
        let old = lead(1, "https://aaa.com");
        let new = lead(2, "https://zzz.com");
        let q = LeadQuery {
            sort_field: Some("websiteUrl".into()),
            sort_direction: SortDirection::Asc,
            ..query()
        };
        let page = compute(&[old, new], &[], &q);
        // Ascending lexicographic order would put aaa first; the quirk puts
        // the most recently created lead first instead.
        assert_eq!(page.rows[0].id, 2);
        assert_eq!(page.rows[1].id, 1);
    }

    #[test]
    fn search_matches_legacy_cased_custom_keys() {
        let mut legacy = lead(1, "https://a.com");
        legacy
            .custom_data
            .insert("Email".to_string(), json!("maria@acme.com"));
        let mut canonical = lead(2, "https://b.com");
        canonical.email = Some("joao@globex.com".to_string());
        let other = lead(3, "https://c.com");

        let q = LeadQuery {
            search: Some("ACME".into()),
            ..query()
        };
        let page = compute(&[legacy.clone(), canonical.clone(), other.clone()], &[], &q);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, 1);

        let q = LeadQuery {
            search: Some("globex".into()),
            ..query()
        };
        let page = compute(&[legacy, canonical, other], &[], &q);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, 2);
    }

    #[test]
    fn category_filter_matches_legacy_cased_custom_keys() {
        let mut legacy = lead(1, "https://a.com");
        legacy
            .custom_data
            .insert("Category".to_string(), json!("SaaS"));
        let mut canonical = lead(2, "https://b.com");
        canonical.category = Some("Fintech".to_string());

        let q = LeadQuery {
            category: Some("SaaS".into()),
            ..query()
        };
        let page = compute(&[legacy, canonical], &[], &q);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.rows[0].id, 1);
    }

    #[test]
    fn all_sentinel_bypasses_filters() {
        let mut seed = lead(1, "https://a.com");
        seed.status = LeadStatus::Contacted;
        let leads = vec![seed, lead(2, "https://b.com")];

        let q = LeadQuery {
            status: Some("all".into()),
            funding_type: Some(String::new()),
            ..query()
        };
        assert_eq!(compute(&leads, &[], &q).total_items, 2);

        let q = LeadQuery {
            status: Some("Contacted".into()),
            ..query()
        };
        let page = compute(&leads, &[], &q);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.rows[0].id, 1);
    }

    #[test]
    fn custom_number_columns_sort_numerically() {
        let repo = ColumnRepository::new(Database::new());
        let column = repo
            .create(crate::store::column_repo::NewColumn {
                name: "Seats".into(),
                column_type: ColumnType::Number,
                required: false,
                default_value: None,
                select_options: Vec::new(),
                conditional_rules: Vec::new(),
            })
            .unwrap();
        let columns = repo.list();

        let mut a = lead(1, "https://a.com");
        a.custom_data.insert(column.field_key.clone(), json!(12));
        let mut b = lead(2, "https://b.com");
        b.custom_data.insert(column.field_key.clone(), json!(3));

        let q = LeadQuery {
            sort_field: Some(column.field_key.clone()),
            sort_direction: SortDirection::Asc,
            ..query()
        };
        let page = compute(&[a, b], &columns, &q);
        let ids: Vec<i64> = page.rows.iter().map(|l| l.id).collect();
        // Numeric coercion: 3 before 12 (string compare would reverse them).
        assert_eq!(ids, vec![2, 1]);
    }
}
