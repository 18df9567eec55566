use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub unlocked: bool,
}

/// What achievements are judged on.
#[derive(Clone, Copy, Debug, Default)]
pub struct AchievementInputs {
    pub total_practices: usize,
    pub best_score: i64,
    pub improvement: i64,
    pub best_streak: usize,
}

enum Rule {
    Practices(usize),
    BestScore(i64),
    Improvement(i64),
    Streak(usize),
}

struct AchievementDef {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    icon: &'static str,
    rule: Rule,
}

const CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: "first_practice",
        title: "First Steps",
        description: "Completed your first practice session",
        icon: "🎯",
        rule: Rule::Practices(1),
    },
    AchievementDef {
        id: "practice_5",
        title: "Getting Started",
        description: "Completed 5 practice sessions",
        icon: "🌟",
        rule: Rule::Practices(5),
    },
    AchievementDef {
        id: "practice_10",
        title: "Committed Speaker",
        description: "Completed 10 practice sessions",
        icon: "🔥",
        rule: Rule::Practices(10),
    },
    AchievementDef {
        id: "practice_25",
        title: "Speech Master",
        description: "Completed 25 practice sessions",
        icon: "👑",
        rule: Rule::Practices(25),
    },
    AchievementDef {
        id: "high_score",
        title: "Excellence",
        description: "Achieved a score of 80 or higher",
        icon: "⭐",
        rule: Rule::BestScore(80),
    },
    AchievementDef {
        id: "perfect_score",
        title: "Perfection",
        description: "Achieved a perfect score of 95+",
        icon: "💯",
        rule: Rule::BestScore(95),
    },
    AchievementDef {
        id: "improved_20",
        title: "Great Progress",
        description: "Improved by 20 points from first practice",
        icon: "📈",
        rule: Rule::Improvement(20),
    },
    AchievementDef {
        id: "streak_3",
        title: "Consistent",
        description: "Practiced for 3 consecutive days",
        icon: "🔥",
        rule: Rule::Streak(3),
    },
];

/// The full catalog with each badge's state, recomputed on every call.
pub fn evaluate(inputs: &AchievementInputs) -> Vec<Achievement> {
    CATALOG
        .iter()
        .map(|def| Achievement {
            id: def.id,
            title: def.title,
            description: def.description,
            icon: def.icon,
            unlocked: match def.rule {
                Rule::Practices(n) => inputs.total_practices >= n,
                Rule::BestScore(min) => inputs.total_practices > 0 && inputs.best_score >= min,
                Rule::Improvement(min) => inputs.total_practices > 0 && inputs.improvement >= min,
                Rule::Streak(days) => inputs.best_streak >= days,
            },
        })
        .collect()
}
