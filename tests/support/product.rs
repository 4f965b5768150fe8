use cartkeep::{Associable, Buyable, Decimal, ItemOptions};

/// A catalogue product as a host application would hand it to the cart.
#[derive(Clone, Debug)]
pub struct Product {
    pub sku: String,
    pub title: String,
    pub price: Decimal,
    pub weight: Decimal,
}

impl Product {
    pub fn new(sku: &str, title: &str, price: Decimal) -> Self {
        Product {
            sku: sku.to_string(),
            title: title.to_string(),
            price,
            weight: Decimal::ZERO,
        }
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }
}

impl Buyable for Product {
    fn buyable_identifier(&self, _options: &ItemOptions) -> String {
        self.sku.clone()
    }

    fn buyable_description(&self, _options: &ItemOptions) -> String {
        self.title.clone()
    }

    fn buyable_price(&self, options: &ItemOptions) -> Decimal {
        // Gift wrapping is a flat two dollars per unit.
        match options.get("gift_wrap").map(String::as_str) {
            Some("yes") => self.price + Decimal::TWO,
            _ => self.price,
        }
    }

    fn buyable_weight(&self, _options: &ItemOptions) -> Decimal {
        self.weight
    }
}

impl Associable for Product {
    const MODEL: &'static str = "Product";
}
