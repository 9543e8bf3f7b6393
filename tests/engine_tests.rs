//! End-to-end flow of a typical list request: free-text search plus
//! typed filters, a sort spec, conditional field flags and reference
//! display, all driven by one entity declaration.

use jobim::prelude::*;
use jobim::FieldValue;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
struct Company {
	id: i64,
	name: String,
	city: String,
}

impl Record for Company {
	fn get(&self, field: &str) -> FieldValue {
		match field {
			"Id" => self.id.into(),
			"Name" => self.name.as_str().into(),
			"City" => self.city.as_str().into(),
			_ => FieldValue::Null,
		}
	}
}

impl Entity for Company {
	fn meta() -> EntityMeta {
		EntityMeta::new("Company")
			.field(FieldMeta::integer("Id").primary_key())
			.field(FieldMeta::text("Name").reference_text())
			.field(FieldMeta::text("City").subtitle(1))
	}
}

#[derive(Clone)]
struct Customer {
	name: String,
	tax_id: Option<String>,
	person_type: i64,
	active: bool,
	company: Option<Arc<Company>>,
}

impl Record for Customer {
	fn get(&self, field: &str) -> FieldValue {
		match field {
			"Name" => self.name.as_str().into(),
			"TaxId" => self.tax_id.clone().into(),
			"PersonType" => FieldValue::Enum {
				variant: if self.person_type == 2 { "Company" } else { "Individual" }
					.to_string(),
				ordinal: self.person_type,
			},
			"Active" => self.active.into(),
			"Company" => self
				.company
				.clone()
				.map(|c| FieldValue::Record(c as Arc<dyn Record>))
				.unwrap_or(FieldValue::Null),
			_ => FieldValue::Null,
		}
	}
}

impl Entity for Customer {
	fn meta() -> EntityMeta {
		EntityMeta::new("Customer")
			.title("Customers")
			.page_size(25)
			.tab(TabMeta::new("main", "Main"))
			.field(FieldMeta::text("Name").grid(1).form(1))
			.field(
				FieldMeta::text("TaxId")
					.formatted("##.###.###/####-##")
					.grid(2)
					.form(2)
					.show_when("PersonType == Company")
					.required_when("PersonType == Company"),
			)
			.field(FieldMeta::enumeration(
				"PersonType",
				[("Individual", 1), ("Company", 2)],
			))
			.field(FieldMeta::boolean("Active"))
			.field(FieldMeta::reference("Company", "Company").relation())
	}
}

fn sample() -> Vec<Customer> {
	let acme = Arc::new(Company { id: 1, name: "Acme Ltda".into(), city: "Recife".into() });
	vec![
		Customer {
			name: "Ana Souza".into(),
			tax_id: None,
			person_type: 1,
			active: true,
			company: None,
		},
		Customer {
			name: "Beta Comercio".into(),
			tax_id: Some("12.345.678/0001-99".into()),
			person_type: 2,
			active: true,
			company: Some(acme.clone()),
		},
		Customer {
			name: "Gama Servicos".into(),
			tax_id: Some("98.765.432/0001-11".into()),
			person_type: 2,
			active: false,
			company: Some(acme),
		},
	]
}

#[test]
fn list_request_search_filter_and_sort() {
	let engine = Engine::new();
	let mut rows = sample();

	let mut filters = HashMap::new();
	filters.insert("search".to_string(), "12345678".to_string());
	filters.insert("active".to_string(), "true".to_string());

	let predicate = engine.filter::<Customer>(&filters);
	rows.retain(|r| predicate.matches(r));
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].name, "Beta Comercio");

	let mut rows = sample();
	engine.order::<Customer>("name", "desc").sort(&mut rows);
	let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
	assert_eq!(names, ["Gama Servicos", "Beta Comercio", "Ana Souza"]);

	// Unknown sort field preserves the incoming order.
	let mut rows = sample();
	let key = engine.order::<Customer>("nope", "asc");
	assert!(key.is_identity());
	key.sort(&mut rows);
	assert_eq!(rows[0].name, "Ana Souza");
}

#[test]
fn descriptor_drives_grid_and_paging() {
	let engine = Engine::new();
	let descriptor = engine.descriptor::<Customer>();
	assert_eq!(descriptor.title, "Customers");
	assert_eq!(descriptor.page_size, 25);
	assert_eq!(descriptor.default_order, "Name");
	let grid: Vec<_> = descriptor
		.grid_fields()
		.iter()
		.map(|f| f.name.as_str())
		.collect();
	assert_eq!(grid, ["Name", "TaxId"]);
	assert!(descriptor.field("Company").unwrap().is_navigation);
}

#[test]
fn conditional_flags_follow_the_record() {
	let engine = Engine::new();
	let rows = sample();

	assert!(!engine.is_visible("TaxId", &rows[0]));
	assert!(engine.is_visible("TaxId", &rows[1]));
	assert!(engine.is_required("TaxId", &rows[1]));
	assert!(!engine.is_required("TaxId", &rows[0]));
	assert!(engine.is_visible("Name", &rows[0]));
}

#[test]
fn reference_display_walks_navigation() {
	let engine = Engine::new();
	let item = engine.display_item::<Company>(&Company {
		id: 9,
		name: "Acme Ltda".into(),
		city: "Recife".into(),
	});
	assert_eq!(item.value, "9");
	assert_eq!(item.text, "Acme Ltda");
	assert_eq!(item.subtitle.as_deref(), Some("Recife"));

	// Dotted paths resolve through the navigation, null-safely.
	let rows = sample();
	let via_nav = jobim::meta::resolve_path(&rows[1], "Company.Name");
	assert_eq!(via_nav.as_text().as_deref(), Some("Acme Ltda"));
	let missing = jobim::meta::resolve_path(&rows[0], "Company.Name");
	assert!(!missing.has_value());
}
