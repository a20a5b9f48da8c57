//! Score store database schema.

/// SQL to create the score records table.
pub const CREATE_SCORE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS score_records (
    id                          UUID PRIMARY KEY,
    startup_id                  UUID NOT NULL,
    judge_id                    UUID NOT NULL,
    round_id                    UUID NOT NULL,
    problem_score               SMALLINT NOT NULL CHECK (problem_score BETWEEN 1 AND 5),
    solution_score              SMALLINT NOT NULL CHECK (solution_score BETWEEN 1 AND 5),
    innovation_score            SMALLINT NOT NULL CHECK (innovation_score BETWEEN 1 AND 5),
    team_score                  SMALLINT NOT NULL CHECK (team_score BETWEEN 1 AND 5),
    business_model_score        SMALLINT NOT NULL CHECK (business_model_score BETWEEN 1 AND 5),
    market_opportunity_score    SMALLINT NOT NULL CHECK (market_opportunity_score BETWEEN 1 AND 5),
    technical_feasibility_score SMALLINT NOT NULL CHECK (technical_feasibility_score BETWEEN 1 AND 5),
    execution_strategy_score    SMALLINT NOT NULL CHECK (execution_strategy_score BETWEEN 1 AND 5),
    pitch_quality_score         SMALLINT NOT NULL CHECK (pitch_quality_score BETWEEN 1 AND 5),
    feedback                    TEXT,
    nominated                   BOOLEAN NOT NULL DEFAULT FALSE,
    nomination_reason           TEXT,
    created_at                  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (startup_id, judge_id, round_id)
);

CREATE INDEX IF NOT EXISTS idx_score_records_startup_id
    ON score_records (startup_id, created_at);

CREATE INDEX IF NOT EXISTS idx_score_records_round_id
    ON score_records (round_id, created_at);
";
