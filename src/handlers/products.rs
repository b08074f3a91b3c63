use crate::error::Result;
use crate::helpers::table::Pagination;
use crate::middleware_layer::access::{authorize, gate};
use crate::models::claims::Role;
use crate::models::product::{NewProduct, Product};
use crate::routes::Action;
use crate::services::api::ApiClient;
use crate::validation::forms::validate_new_product;

pub const FETCH_FAILED: &str = "Failed to fetch products. Please try again.";
pub const ADD_FAILED: &str = "Failed to add product. Please try again.";

/// The products list view.
#[derive(Debug, Default)]
pub struct ProductsView {
    pub products: Vec<Product>,
    pub error: Option<String>,
    pub pagination: Pagination,
}

impl ProductsView {
    pub fn new(pagination: Pagination) -> Self {
        Self { pagination, ..Self::default() }
    }

    pub async fn load(&mut self, api: &ApiClient) {
        match api.fetch_products().await {
            Ok(products) => {
                tracing::debug!("📦 Loaded {} products", products.len());
                self.products = products;
                self.error = None;
            }
            Err(e) => {
                self.products.clear();
                self.error = e.user_message(FETCH_FAILED);
            }
        }
    }

    pub fn actions(&self, role: Option<Role>) -> Vec<Action> {
        gate(Action::AddProduct.required_roles(), role, || Action::AddProduct)
            .into_iter()
            .collect()
    }

    pub async fn add(&mut self, api: &ApiClient, form: NewProduct) -> Result<Product> {
        let result = Self::try_add(api, form).await;

        match &result {
            Ok(product) => {
                self.products.push(product.clone());
                self.error = None;
            }
            Err(e) => self.error = e.user_message(ADD_FAILED),
        }
        result
    }

    async fn try_add(api: &ApiClient, form: NewProduct) -> Result<Product> {
        authorize(Action::AddProduct.required_roles(), api.session().role(), Action::AddProduct)?;
        validate_new_product(&form)?;
        api.add_product(&form).await
    }

    pub fn page(&self) -> &[Product] {
        self.pagination.slice(&self.products)
    }
}
