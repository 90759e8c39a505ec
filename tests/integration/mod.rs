mod basic_integration;
mod leaderboard_integration;
