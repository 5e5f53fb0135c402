/// Format predicate over phone numbers
pub trait PhoneValidator: Clone {
    fn is_valid(&self, phone: &str) -> bool;
}
