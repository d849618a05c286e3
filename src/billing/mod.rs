mod gate;
mod seats;
mod subscription;

pub use gate::{check_subscription, FeatureGate, GameAllowance, SubscriptionCheck, SubscriptionSummary};
pub use seats::{seat_counter, SeatCounter};
pub use subscription::{MaxGames, PlanFeatures, Subscription, SubscriptionProduct, SubscriptionStatus, SubscriptionUpdate};
