//! Price calculation for order line items.
//!
//! An item starts at the dish's base price and accumulates surcharges from
//! the customer's selected options. Selections that do not match anything on
//! the dish are ignored rather than rejected, so menu edits cannot break
//! in-flight requests.

use eats_types::{Dish, OrderItemOption};
use rust_decimal::Decimal;

/// Computes the price of one line item.
///
/// For each selection, the dish option with the same name is looked up. An
/// option with a flat `extra` adds it and ends that selection's evaluation,
/// even when a choice list is also present. Otherwise the selection's choice
/// is matched against the option's choices and that choice's extra, when
/// set, is added.
pub fn item_price(dish: &Dish, selections: &[OrderItemOption]) -> Decimal {
	let mut price = dish.price;

	for selection in selections {
		let Some(option) = dish.options.iter().find(|o| o.name == selection.name) else {
			continue;
		};

		// A flat surcharge wins over any choice list
		if let Some(extra) = option.extra {
			price += extra;
			continue;
		}

		if let (Some(choices), Some(chosen)) = (&option.choices, &selection.choice) {
			if let Some(choice) = choices.iter().find(|c| &c.name == chosen) {
				if let Some(extra) = choice.extra {
					price += extra;
				}
			}
		}
	}

	price
}

#[cfg(test)]
mod tests {
	use super::*;
	use eats_types::{DishOption, DishOptionChoice};

	fn decimal(s: &str) -> Decimal {
		s.parse().unwrap()
	}

	fn dish() -> Dish {
		Dish {
			id: "d-1".to_string(),
			restaurant_id: "r-1".to_string(),
			name: "Margherita".to_string(),
			description: None,
			price: decimal("8.00"),
			options: vec![
				DishOption {
					name: "Spicy".to_string(),
					extra: Some(decimal("0.50")),
					choices: None,
				},
				DishOption {
					name: "Size".to_string(),
					extra: None,
					choices: Some(vec![
						DishOptionChoice {
							name: "Regular".to_string(),
							extra: None,
						},
						DishOptionChoice {
							name: "Large".to_string(),
							extra: Some(decimal("2.00")),
						},
					]),
				},
			],
		}
	}

	fn selection(name: &str, choice: Option<&str>) -> OrderItemOption {
		OrderItemOption {
			name: name.to_string(),
			choice: choice.map(|c| c.to_string()),
		}
	}

	#[test]
	fn test_base_price_without_selections() {
		assert_eq!(item_price(&dish(), &[]), decimal("8.00"));
	}

	#[test]
	fn test_flat_extra() {
		let price = item_price(&dish(), &[selection("Spicy", None)]);
		assert_eq!(price, decimal("8.50"));
	}

	#[test]
	fn test_choice_extra() {
		let price = item_price(&dish(), &[selection("Size", Some("Large"))]);
		assert_eq!(price, decimal("10.00"));
	}

	#[test]
	fn test_choice_without_extra_adds_nothing() {
		let price = item_price(&dish(), &[selection("Size", Some("Regular"))]);
		assert_eq!(price, decimal("8.00"));
	}

	#[test]
	fn test_flat_extra_wins_over_choices() {
		let mut dish = dish();
		// Malformed menu entry carrying both forms: the flat extra applies
		dish.options[1].extra = Some(decimal("1.00"));

		let price = item_price(&dish, &[selection("Size", Some("Large"))]);
		assert_eq!(price, decimal("9.00"));
	}

	#[test]
	fn test_unmatched_option_is_ignored() {
		let price = item_price(&dish(), &[selection("Gluten Free", None)]);
		assert_eq!(price, decimal("8.00"));
	}

	#[test]
	fn test_unmatched_choice_is_ignored() {
		let price = item_price(&dish(), &[selection("Size", Some("Gigantic"))]);
		assert_eq!(price, decimal("8.00"));
	}

	#[test]
	fn test_selections_accumulate() {
		let price = item_price(
			&dish(),
			&[selection("Spicy", None), selection("Size", Some("Large"))],
		);
		assert_eq!(price, decimal("10.50"));
	}

	#[test]
	fn test_selection_order_does_not_matter() {
		let forward = item_price(
			&dish(),
			&[selection("Spicy", None), selection("Size", Some("Large"))],
		);
		let reversed = item_price(
			&dish(),
			&[selection("Size", Some("Large")), selection("Spicy", None)],
		);
		assert_eq!(forward, reversed);
	}
}
