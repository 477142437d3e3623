//! Demo seed data: the produce catalog and the mock user directory.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::aggregates::product::Category;
use crate::domain::aggregates::user::UserRole;
use crate::domain::aggregates::{Product, User};
use crate::domain::value_objects::{Money, StockKg};

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    category: Category,
    price: i64,
    stock: i64,
    emoji: &str,
    supplier_id: &str,
    supplier_name: &str,
    radius_km: u32,
    now: DateTime<Utc>,
) -> Product {
    Product::new(
        id,
        name,
        category,
        Money::inr(Decimal::new(price, 0)),
        StockKg::new(Decimal::new(stock, 0)).unwrap_or_default(),
        emoji,
        supplier_id,
        supplier_name,
        radius_km,
        now,
    )
}

pub fn products(now: DateTime<Utc>) -> Vec<Product> {
    use Category::*;
    vec![
        product("prod1", "Tomatoes", Vegetables, 40, 120, "🍅", "sup1", "Kannan Farms", 30, now),
        product("prod2", "Onions", Vegetables, 35, 200, "🧅", "sup1", "Kannan Farms", 30, now),
        product("prod3", "Potatoes", Vegetables, 30, 180, "🥔", "sup1", "Kannan Farms", 30, now),
        product("prod4", "Carrots", Vegetables, 45, 90, "🥕", "sup2", "Velu Organic Farm", 25, now),
        product("prod5", "Cucumber", Vegetables, 25, 60, "🥒", "sup2", "Velu Organic Farm", 25, now),
        product("prod6", "Spinach", Vegetables, 20, 40, "🥬", "sup2", "Velu Organic Farm", 25, now),
        product("prod7", "Cauliflower", Vegetables, 50, 75, "🥦", "sup3", "Meenakshi Gardens", 15, now),
        product("prod8", "Green Chillies", Vegetables, 80, 30, "🌶️", "sup3", "Meenakshi Gardens", 15, now),
        product("prod9", "Bananas", Fruits, 50, 160, "🍌", "sup4", "Thanjavur Orchards", 40, now),
        product("prod10", "Mangoes", Fruits, 120, 85, "🥭", "sup4", "Thanjavur Orchards", 40, now),
        product("prod11", "Apples", Fruits, 150, 70, "🍎", "sup4", "Thanjavur Orchards", 40, now),
        product("prod12", "Lemons", Fruits, 60, 45, "🍋", "sup3", "Meenakshi Gardens", 15, now),
        product("prod13", "Lentils", Grains, 90, 220, "🫘", "sup5", "Kaveri Grains Co", 50, now),
        product("prod14", "Ginger", Spices, 110, 35, "🫚", "sup5", "Kaveri Grains Co", 50, now),
        product("prod15", "Garlic", Spices, 130, 50, "🧄", "sup5", "Kaveri Grains Co", 50, now),
        product("prod16", "Rice", Grains, 55, 300, "🍚", "sup5", "Kaveri Grains Co", 50, now),
        product("prod17", "Wheat Flour", Grains, 42, 250, "🌾", "sup5", "Kaveri Grains Co", 50, now),
        product("prod18", "Turmeric", Spices, 180, 25, "🟡", "sup6", "Chettinad Spice House", 35, now),
        product("prod19", "Cumin", Spices, 300, 15, "🟤", "sup6", "Chettinad Spice House", 35, now),
        product("prod20", "Coriander", Spices, 150, 20, "🌿", "sup6", "Chettinad Spice House", 35, now),
        product("prod21", "Black Pepper", Spices, 450, 12, "⚫", "sup6", "Chettinad Spice House", 35, now),
        product("prod22", "Groundnut Oil", Oils, 160, 80, "🥜", "sup6", "Chettinad Spice House", 35, now),
        product("prod23", "Coconut Oil", Oils, 190, 95, "🥥", "sup6", "Chettinad Spice House", 35, now),
        product("prod24", "Sesame Oil", Oils, 210, 40, "🫙", "sup6", "Chettinad Spice House", 35, now),
        product("prod25", "Milk", Dairy, 28, 140, "🥛", "sup7", "Annai Dairy", 20, now),
        product("prod26", "Paneer", Dairy, 320, 30, "🧀", "sup7", "Annai Dairy", 20, now),
        product("prod27", "Ghee", Dairy, 550, 55, "🧈", "sup7", "Annai Dairy", 20, now),
        product("prod28", "Yogurt", Dairy, 70, 65, "🥣", "sup7", "Annai Dairy", 20, now),
    ]
}

pub fn users(now: DateTime<Utc>) -> Vec<User> {
    let user = |uid: &str, name: &str, email: &str, phone: &str, role, location: &str| {
        User::new(uid, name, email, phone, role, location, true, now)
    };
    vec![
        user("ven1", "Saravana Snacks", "saravana@example.com", "9840011001", UserRole::Vendor, "T. Nagar, Chennai"),
        user("ven2", "Kamala Chaat Corner", "kamala@example.com", "9840011002", UserRole::Vendor, "Mylapore, Chennai"),
        user("sup1", "Kannan Farms", "kannan@example.com", "9840022001", UserRole::Supplier, "Red Hills, Chennai"),
        user("sup2", "Velu Organic Farm", "velu@example.com", "9840022002", UserRole::Supplier, "Kanchipuram"),
        user("sup3", "Meenakshi Gardens", "meenakshi@example.com", "9840022003", UserRole::Supplier, "Madurai"),
        user("sup4", "Thanjavur Orchards", "thanjavur@example.com", "9840022004", UserRole::Supplier, "Thanjavur"),
        user("sup5", "Kaveri Grains Co", "kaveri@example.com", "9840022005", UserRole::Supplier, "Trichy"),
        user("sup6", "Chettinad Spice House", "chettinad@example.com", "9840022006", UserRole::Supplier, "Karaikudi"),
        user("sup7", "Annai Dairy", "annai@example.com", "9840022007", UserRole::Supplier, "Salem"),
    ]
}
