/// The player's money. Only settlement of a resolved hand changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    bankroll: f64,
    starting_bankroll: f64,
    min_bankroll: f64,
    max_bankroll: f64,
}

impl Player {
    pub fn new(starting_bankroll: f64) -> Player {
        Player {
            bankroll: starting_bankroll,
            starting_bankroll,
            min_bankroll: starting_bankroll,
            max_bankroll: starting_bankroll,
        }
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn starting_bankroll(&self) -> f64 {
        self.starting_bankroll
    }

    pub fn min_bankroll(&self) -> f64 {
        self.min_bankroll
    }

    pub fn max_bankroll(&self) -> f64 {
        self.max_bankroll
    }

    /// Returns true if the bankroll covers `amount`.
    pub fn can_cover(&self, amount: f64) -> bool {
        self.bankroll >= amount
    }

    /// Applies the signed result of a hand and refreshes the bankroll extremes.
    pub fn settle(&mut self, profit: f64) {
        self.bankroll += profit;
        self.min_bankroll = f64::min(self.min_bankroll, self.bankroll);
        self.max_bankroll = f64::max(self.max_bankroll, self.bankroll);
    }

    pub fn profit(&self) -> f64 {
        self.bankroll - self.starting_bankroll
    }
}
