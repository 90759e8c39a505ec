mod streak_properties;
