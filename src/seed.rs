use rust_decimal_macros::dec;
use tracing::info;

use crate::app_system::StoreSystem;
use crate::domain::{ProductInput, Role, UserCreate};

/// Seeds the demo accounts and catalog so a fresh process has something to
/// sell. The admin account created here is the only way to get admin access;
/// registration over HTTP always produces a regular shopper.
pub async fn seed_demo_data(system: &StoreSystem) -> Result<(), String> {
    system
        .users
        .register(UserCreate {
            name: "Admin User".to_string(),
            email: "admin@kenkeputa.com".to_string(),
            password: "admin123".to_string(),
            role: Role::Admin,
        })
        .await
        .map_err(|e| e.to_string())?;

    system
        .users
        .register(UserCreate {
            name: "Test User".to_string(),
            email: "user@test.com".to_string(),
            password: "user123".to_string(),
            role: Role::User,
        })
        .await
        .map_err(|e| e.to_string())?;

    let products = [
        (
            "Smartphone X1",
            dec!(599.99),
            50,
            "Latest smartphone with advanced features",
            "https://images.unsplash.com/photo-1726900303595-8c1f9250535f",
        ),
        (
            "Laptop Pro",
            dec!(1299.99),
            25,
            "High-performance laptop for professionals",
            "https://images.unsplash.com/photo-1541807084-5c52b6b3adef",
        ),
        (
            "Wireless Headphones",
            dec!(199.99),
            100,
            "Premium wireless headphones with noise cancellation",
            "https://images.unsplash.com/photo-1691649485759-2ca657415fde",
        ),
        (
            "Smart Watch",
            dec!(299.99),
            75,
            "Fitness tracking smartwatch with heart rate monitor",
            "https://images.unsplash.com/photo-1637160151663-a410315e4e75",
        ),
        (
            "Tablet Air",
            dec!(449.99),
            40,
            "10-inch tablet perfect for work and entertainment",
            "https://images.unsplash.com/photo-1682427286841-1f3ff788752b",
        ),
        (
            "Gaming Mouse",
            dec!(79.99),
            150,
            "High-precision gaming mouse with RGB lighting",
            "https://images.unsplash.com/photo-1629429408209-1f912961dbd8",
        ),
        (
            "Bluetooth Speaker",
            dec!(89.99),
            80,
            "Portable bluetooth speaker with deep bass",
            "https://images.unsplash.com/photo-1582978571763-2d039e56f0c3",
        ),
        (
            "USB-C Cable",
            dec!(19.99),
            200,
            "Fast charging USB-C cable - 6ft length",
            "https://images.unsplash.com/photo-1657181253444-66c4745d5a86",
        ),
    ];

    for (name, price, stock, description, image_url) in products {
        system
            .catalog
            .create_product(ProductInput {
                name: name.to_string(),
                price,
                stock,
                description: description.to_string(),
                image_url: image_url.to_string(),
            })
            .await
            .map_err(|e| e.to_string())?;
    }

    info!("Store seeded successfully");
    info!("Admin login: admin@kenkeputa.com / admin123");
    info!("Test user login: user@test.com / user123");

    Ok(())
}
