//! Schedule granularity: how many days each generated entry covers.

/// JSON type of a record's `day` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Integer,
    String,
}

impl FieldShape {
    /// Placeholder shown in the prompt's schema block.
    pub fn placeholder(self) -> &'static str {
        match self {
            FieldShape::Integer => "<integer>",
            FieldShape::String => "\"<string>\"",
        }
    }
}

/// Period description, `day` shape and example value for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GranularityDescriptor {
    pub instruction: &'static str,
    pub field_shape: FieldShape,
    pub example_value: &'static str,
}

impl GranularityDescriptor {
    /// The example value as it should appear inside a JSON object.
    pub fn example_json(&self) -> String {
        match self.field_shape {
            FieldShape::Integer => self.example_value.to_string(),
            FieldShape::String => format!("\"{}\"", self.example_value),
        }
    }
}

const MONTHLY: GranularityDescriptor = GranularityDescriptor {
    instruction: "Because the total duration is longer than a year, create one entry per month. \
                  The \"day\" field must be a string naming the month, like \"Month 1\", \"Month 2\", and so on.",
    field_shape: FieldShape::String,
    example_value: "Month 1",
};

const TEN_DAY: GranularityDescriptor = GranularityDescriptor {
    instruction: "Because the total duration is between six months and a year, create one entry per 10-day block. \
                  The \"day\" field must be a string giving the day range, like \"1-10\", \"11-20\", and so on.",
    field_shape: FieldShape::String,
    example_value: "1-10",
};

const FIVE_DAY: GranularityDescriptor = GranularityDescriptor {
    instruction: "Because the total duration is between two and six months, create one entry per 5-day block. \
                  The \"day\" field must be a string giving the day range, like \"1-5\", \"6-10\", and so on.",
    field_shape: FieldShape::String,
    example_value: "1-5",
};

const TWO_DAY: GranularityDescriptor = GranularityDescriptor {
    instruction: "Because the total duration is between one and two months, create one entry per 2-day block. \
                  The \"day\" field must be a string giving the day range, like \"1-2\", \"3-4\", and so on.",
    field_shape: FieldShape::String,
    example_value: "1-2",
};

const DAILY: GranularityDescriptor = GranularityDescriptor {
    instruction: "Create one entry per day. \
                  The \"day\" field must be an integer day number, like 1, 2, 3, and so on.",
    field_shape: FieldShape::Integer,
    example_value: "1",
};

/// Pick the bucket for a schedule spanning `days` days.
pub fn select_granularity(days: u32) -> GranularityDescriptor {
    if days > 365 {
        MONTHLY
    } else if days > 180 {
        TEN_DAY
    } else if days > 60 {
        FIVE_DAY
    } else if days > 30 {
        TWO_DAY
    } else {
        DAILY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_bucket() {
        for days in [0, 1, 7, 30] {
            let g = select_granularity(days);
            assert_eq!(g.field_shape, FieldShape::Integer);
            assert_eq!(g.example_value, "1");
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(select_granularity(31).example_value, "1-2");
        assert_eq!(select_granularity(60).example_value, "1-2");
        assert_eq!(select_granularity(61).example_value, "1-5");
        assert_eq!(select_granularity(180).example_value, "1-5");
        assert_eq!(select_granularity(181).example_value, "1-10");
        assert_eq!(select_granularity(365).example_value, "1-10");
        assert_eq!(select_granularity(366).example_value, "Month 1");
        assert_eq!(select_granularity(u32::MAX).example_value, "Month 1");
    }

    #[test]
    fn test_coarse_buckets_use_strings() {
        for days in [31, 61, 181, 366] {
            assert_eq!(select_granularity(days).field_shape, FieldShape::String);
        }
    }

    #[test]
    fn test_example_json() {
        assert_eq!(select_granularity(10).example_json(), "1");
        assert_eq!(select_granularity(400).example_json(), "\"Month 1\"");
        assert_eq!(FieldShape::Integer.placeholder(), "<integer>");
        assert_eq!(FieldShape::String.placeholder(), "\"<string>\"");
    }
}
