#[cfg(test)]
mod tests {
    use crate::housing::{render_stock_grid, unit_glyph, HousingStock, HousingUnit, OwnerType, Usage};

    fn unit(id: u32, owner: OwnerType, usage: Usage, price: f64) -> HousingUnit {
        HousingUnit::new(id, owner, usage, price)
    }

    fn mixed_stock() -> HousingStock {
        vec![
            unit(0, OwnerType::Corporate, Usage::ShortTermRental, 100.0),
            unit(1, OwnerType::Corporate, Usage::LongTermRental, 100.0),
            unit(2, OwnerType::Individual, Usage::LongTermRental, 100.0),
            unit(3, OwnerType::Homeowner, Usage::LongTermRental, 100.0),
            unit(4, OwnerType::Homeowner, Usage::ShortTermRental, 100.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_new_unit_rent_is_half_percent_of_price() {
        let u = unit(0, OwnerType::Individual, Usage::LongTermRental, 400_000.0);
        assert!((u.rent - 2_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_appreciate_scales_landlord_rent() {
        let mut u = unit(0, OwnerType::Corporate, Usage::LongTermRental, 100_000.0);
        u.appreciate(1.1);
        assert!((u.price - 110_000.0).abs() < 1e-6);
        assert!((u.rent - 550.0).abs() < 1e-9);
    }

    #[test]
    fn test_appreciate_freezes_homeowner_rent() {
        let mut u = unit(0, OwnerType::Homeowner, Usage::LongTermRental, 100_000.0);
        u.appreciate(1.1);
        assert!((u.price - 110_000.0).abs() < 1e-6);
        assert!((u.rent - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_available_rental_excludes_homeowners_and_short_term() {
        let stock = mixed_stock();
        assert_eq!(stock.count_available_rentals(), 2);
        assert_eq!(stock.available_rental_indices(), vec![1, 2]);
    }

    #[test]
    fn test_owner_counts() {
        let counts = mixed_stock().owner_counts();
        assert_eq!(counts.corporate, 2);
        assert_eq!(counts.individual, 1);
        assert_eq!(counts.homeowner, 2);
        assert_eq!(counts.unowned, 0);
        assert_eq!(counts.get(OwnerType::Homeowner), 2);
    }

    #[test]
    fn test_ratios() {
        let stock = mixed_stock();
        assert!((stock.corporate_ratio() - 0.4).abs() < 1e-12);
        assert!((stock.short_term_ratio() - 0.4).abs() < 1e-12);
        assert_eq!(HousingStock::default().corporate_ratio(), 0.0);
    }

    #[test]
    fn test_push_assigns_sequential_ids() {
        let mut stock = HousingStock::default();
        let a = stock.push(OwnerType::Unowned, Usage::LongTermRental, 1.0);
        let b = stock.push(OwnerType::Unowned, Usage::LongTermRental, 1.0);
        assert_eq!((a, b), (0, 1));
        assert_eq!(stock.units()[1].id, 1);
        assert_eq!(stock.next_id(), 2);
    }

    #[test]
    fn test_indices_owned_by() {
        let stock = mixed_stock();
        assert_eq!(stock.indices_owned_by(OwnerType::Homeowner), vec![3, 4]);
        assert!(stock.indices_owned_by(OwnerType::Unowned).is_empty());
    }

    #[test]
    fn test_unit_glyph_priority() {
        let str_corp = unit(0, OwnerType::Corporate, Usage::ShortTermRental, 1.0);
        assert_eq!(unit_glyph(&str_corp), 'S');
        let home = unit(1, OwnerType::Homeowner, Usage::LongTermRental, 1.0);
        assert_eq!(unit_glyph(&home), 'H');
    }

    #[test]
    fn test_render_stock_grid_wraps() {
        let grid = render_stock_grid(&mixed_stock(), 2);
        assert_eq!(grid, "SC\nIH\nS");
        assert_eq!(render_stock_grid(&HousingStock::default(), 10), "");
    }

    #[test]
    fn test_render_stock_grid_zero_width() {
        let grid = render_stock_grid(&mixed_stock(), 0);
        assert_eq!(grid.lines().count(), 5);
    }
}
