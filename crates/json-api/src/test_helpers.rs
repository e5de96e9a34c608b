//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};

use stockroom_app::{
    context::AppContext,
    domain::products::{
        MockProductsService,
        records::{ProductId, ProductRecord},
    },
};

use crate::{errors, state::State};

pub(crate) fn make_product(id: i32) -> ProductRecord {
    ProductRecord {
        id: ProductId::from_i32(id),
        name: "Widget".to_string(),
        description: Some(String::new()),
        price: Decimal::new(999, 2),
        stock: 5,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    State::from_app_context(AppContext::new(Arc::new(products)))
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_products(products)))
            .push(route),
    )
    .catcher(errors::catcher())
}
