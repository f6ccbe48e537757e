use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBalance {
    pub date: String, // YYYY-MM-DD, UTC
    pub burned: i64,
    pub consumed: i64,
    pub net: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub workouts_completed: i64,
    pub current_streak_days: u32,
    pub calories_burned_this_month: i64,
    pub calories_consumed_this_month: i64,
    pub weekly_balance: Vec<DayBalance>,
}
