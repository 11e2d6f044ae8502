//! Rate request assembly.
//!
//! Pure transformation from store configuration and the host package into
//! the request document sent to the rate service.

use live_rates_core::{
    AdditionalFields, Address, CartItem, Country, CustomerInfo, LineItem, PackageDestination,
    RateRequest, State,
};
use thiserror::Error;

use crate::config::StoreConfig;

/// Errors building a rate request.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Store location is not in `Country:State` form.
    #[error("store default country {0:?} is not in Country:State form")]
    InvalidStoreCountry(String),
}

/// Builds rate requests for one store.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    store: StoreConfig,
}

impl RequestBuilder {
    #[must_use]
    pub const fn new(store: StoreConfig) -> Self {
        Self { store }
    }

    /// Store configuration this builder reads.
    #[must_use]
    pub const fn store(&self) -> &StoreConfig {
        &self.store
    }

    /// Build the request for a destination and cart contents.
    ///
    /// `customer` supplies the destination company. Without a customer the
    /// company is sent as an empty string.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InvalidStoreCountry` if the store location lacks
    /// the `:` separator.
    pub fn build(
        &self,
        destination: &PackageDestination,
        contents: &[CartItem],
        customer: Option<&CustomerInfo>,
    ) -> Result<RateRequest, BuildError> {
        let origin = self.origin()?;
        let destination = destination_address(destination, customer);
        let items = self.line_items(contents);

        Ok(RateRequest::single(
            self.store.currency.clone(),
            origin,
            destination,
            items,
        ))
    }

    fn origin(&self) -> Result<Address, BuildError> {
        let (country, parsed_state) = split_country_state(&self.store.default_country)?;

        let state = if self.store.state.trim().is_empty() {
            parsed_state
        } else {
            self.store.state.clone()
        };

        Ok(Address {
            postcode: self.store.postcode.clone(),
            address1: self.store.address.clone(),
            address2: self.store.address_2.clone(),
            phone: String::new(),
            city: self.store.city.clone(),
            country: Country::from_code(&country),
            state: State { name: state },
            company: None,
        })
    }

    fn line_items(&self, contents: &[CartItem]) -> Vec<LineItem> {
        let weight_unit = &self.store.weight_unit;
        let dimension_unit = &self.store.dimension_unit;

        contents
            .iter()
            .map(|item| LineItem {
                id: item.key.clone(),
                product_id: item.product_id,
                variant_id: item.variation_id.filter(|&id| id != 0),
                sku: item.product.sku.clone(),
                name: item.product.name.clone(),
                price: item.product.price,
                tax: item.line_tax,
                quantity: item.quantity,
                weight_unit: weight_unit.clone(),
                weight: item.product.weight,
                options: Vec::new(),
                additional_fields: AdditionalFields {
                    dimensions_unit: dimension_unit.clone(),
                    height: item.product.height,
                    width: item.product.width,
                    length: item.product.length,
                },
            })
            .collect()
    }
}

/// Split `"AU:NSW"` into `("AU", "NSW")`, trimming both parts.
fn split_country_state(raw: &str) -> Result<(String, String), BuildError> {
    let (country, state) = raw
        .split_once(':')
        .ok_or_else(|| BuildError::InvalidStoreCountry(raw.to_string()))?;
    Ok((country.trim().to_string(), state.trim().to_string()))
}

fn destination_address(
    destination: &PackageDestination,
    customer: Option<&CustomerInfo>,
) -> Address {
    Address {
        postcode: destination.postcode.clone(),
        address1: destination.address_1.clone(),
        address2: destination.address_2.clone(),
        phone: String::new(),
        city: destination.city.clone(),
        country: Country::from_code(&destination.country),
        state: State {
            name: destination.state.clone(),
        },
        company: Some(
            customer
                .map(|c| c.shipping_company.clone())
                .unwrap_or_default(),
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use live_rates_core::CartProduct;
    use rust_decimal::Decimal;

    use super::*;

    fn store() -> StoreConfig {
        StoreConfig {
            default_country: "AU : NSW".to_string(),
            postcode: "2000".to_string(),
            address: "1 George St".to_string(),
            address_2: "Level 3".to_string(),
            city: "Sydney".to_string(),
            state: String::new(),
            currency: "AUD".to_string(),
            weight_unit: "kg".to_string(),
            dimension_unit: "cm".to_string(),
        }
    }

    fn destination() -> PackageDestination {
        PackageDestination {
            country: "AU".to_string(),
            state: "VIC".to_string(),
            postcode: "3000".to_string(),
            city: "Melbourne".to_string(),
            address_1: "1 Collins St".to_string(),
            address_2: String::new(),
        }
    }

    fn cart_item(key: &str, variation_id: Option<u64>) -> CartItem {
        CartItem {
            key: key.to_string(),
            product_id: 10,
            variation_id,
            quantity: 3,
            line_tax: Decimal::new(330, 2),
            product: CartProduct {
                sku: "MUG".to_string(),
                name: "Mug".to_string(),
                price: Decimal::new(1100, 2),
                weight: Some(Decimal::new(4, 1)),
                height: Some(Decimal::new(10, 0)),
                width: Some(Decimal::new(8, 0)),
                length: None,
            },
        }
    }

    #[test]
    fn test_origin_from_store_config() {
        let request = RequestBuilder::new(store())
            .build(&destination(), &[], None)
            .unwrap();
        let origin = &request.packages[0].origin;

        assert_eq!(origin.country.code2, "AU");
        assert_eq!(origin.state.name, "NSW");
        assert_eq!(origin.address2, "Level 3");
        assert_eq!(origin.phone, "");
        assert!(origin.company.is_none());
    }

    #[test]
    fn test_explicit_store_state_wins() {
        let mut config = store();
        config.state = "New South Wales".to_string();

        let request = RequestBuilder::new(config)
            .build(&destination(), &[], None)
            .unwrap();
        assert_eq!(request.packages[0].origin.state.name, "New South Wales");
    }

    #[test]
    fn test_missing_separator_is_error() {
        let mut config = store();
        config.default_country = "AU".to_string();

        let err = RequestBuilder::new(config)
            .build(&destination(), &[], None)
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidStoreCountry(_)));
    }

    #[test]
    fn test_destination_company() {
        let builder = RequestBuilder::new(store());

        let request = builder.build(&destination(), &[], None).unwrap();
        assert_eq!(request.packages[0].destination.company.as_deref(), Some(""));

        let customer = CustomerInfo {
            shipping_company: "Acme Pty Ltd".to_string(),
        };
        let request = builder
            .build(&destination(), &[], Some(&customer))
            .unwrap();
        assert_eq!(
            request.packages[0].destination.company.as_deref(),
            Some("Acme Pty Ltd")
        );
    }

    #[test]
    fn test_zero_variation_is_null() {
        let contents = [
            cart_item("a", Some(0)),
            cart_item("b", None),
            cart_item("c", Some(77)),
        ];
        let request = RequestBuilder::new(store())
            .build(&destination(), &contents, None)
            .unwrap();
        let items = &request.packages[0].items;

        assert_eq!(items[0].variant_id, None);
        assert_eq!(items[1].variant_id, None);
        assert_eq!(items[2].variant_id, Some(77));
    }

    #[test]
    fn test_units_applied_to_every_line_in_order() {
        let contents = [cart_item("first", None), cart_item("second", None)];
        let request = RequestBuilder::new(store())
            .build(&destination(), &contents, None)
            .unwrap();
        let items = &request.packages[0].items;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "first");
        assert_eq!(items[1].id, "second");
        for item in items {
            assert_eq!(item.weight_unit, "kg");
            assert_eq!(item.additional_fields.dimensions_unit, "cm");
            assert_eq!(item.quantity, 3);
            assert_eq!(item.tax, Decimal::new(330, 2));
        }
    }

    #[test]
    fn test_same_sku_lines_not_merged() {
        let contents = [cart_item("a", None), cart_item("b", None)];
        let request = RequestBuilder::new(store())
            .build(&destination(), &contents, None)
            .unwrap();
        assert_eq!(request.packages[0].items.len(), 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = RequestBuilder::new(store());
        let contents = [cart_item("a", Some(5))];

        let first = builder.build(&destination(), &contents, None).unwrap();
        let second = builder.build(&destination(), &contents, None).unwrap();
        assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());
    }
}
