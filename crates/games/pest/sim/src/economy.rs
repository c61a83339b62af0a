/// The single "light" resource pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Economy {
    light: u32,
}

impl Economy {
    pub fn new(light: u32) -> Self {
        Self { light }
    }

    pub fn light(&self) -> u32 {
        self.light
    }

    /// Deducts only if the full amount is available.
    pub fn try_spend(&mut self, amount: u32) -> bool {
        match self.light.checked_sub(amount) {
            Some(rest) => {
                self.light = rest;
                true
            }
            None => false,
        }
    }

    pub fn add(&mut self, amount: u32) {
        self.light = self.light.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_is_all_or_nothing() {
        let mut economy = Economy::new(120);
        assert!(economy.try_spend(100));
        assert_eq!(economy.light(), 20);
        assert!(!economy.try_spend(50));
        assert_eq!(economy.light(), 20);
        assert!(economy.try_spend(20));
        assert_eq!(economy.light(), 0);
    }

    #[test]
    fn test_add_credits() {
        let mut economy = Economy::new(0);
        economy.add(25);
        economy.add(100);
        assert_eq!(economy.light(), 125);
    }
}
