use crate::models::question::{Question, QuestionOption, OPTION_IDS};

struct Entry {
    id: &'static str,
    category: &'static str,
    question: &'static str,
    options: [&'static str; 4],
    correct: &'static str,
    explanation: &'static str,
}

static ENTRIES: &[Entry] = &[
    Entry {
        id: "fb_001",
        category: "SQL",
        question: "Which SQL keyword is used to remove duplicate rows from a result set?",
        options: ["REMOVE", "DELETE", "DISTINCT", "UNIQUE"],
        correct: "c",
        explanation: "DISTINCT eliminates duplicate rows from the query result set.",
    },
    Entry {
        id: "fb_002",
        category: "Relational Model",
        question: "What does the 'A' in ACID stand for?",
        options: ["Availability", "Atomicity", "Accuracy", "Authorization"],
        correct: "b",
        explanation: "Atomicity guarantees that a transaction is applied entirely or not at all.",
    },
    Entry {
        id: "fb_003",
        category: "Relational Model",
        question: "Which constraint uniquely identifies each row in a table and forbids NULL values?",
        options: ["FOREIGN KEY", "CHECK", "PRIMARY KEY", "DEFAULT"],
        correct: "c",
        explanation: "A primary key is unique per row and cannot contain NULL.",
    },
    Entry {
        id: "fb_004",
        category: "Normalization",
        question: "A relation is in Second Normal Form when it is in 1NF and:",
        options: [
            "It has no transitive dependencies",
            "Every non-key attribute depends on the whole candidate key",
            "It has no multivalued dependencies",
            "Every determinant is a candidate key",
        ],
        correct: "b",
        explanation: "2NF removes partial dependencies of non-key attributes on part of a composite key.",
    },
    Entry {
        id: "fb_005",
        category: "Normalization",
        question: "Which normal form requires that every determinant be a candidate key?",
        options: ["1NF", "2NF", "3NF", "BCNF"],
        correct: "d",
        explanation: "Boyce-Codd Normal Form requires every functional dependency's left side to be a superkey.",
    },
    Entry {
        id: "fb_006",
        category: "ER Modeling",
        question: "In an ER diagram, a weak entity set is one that:",
        options: [
            "Has no attributes",
            "Cannot be identified without its owner entity",
            "Participates in no relationships",
            "Has only derived attributes",
        ],
        correct: "b",
        explanation: "A weak entity depends on an identifying relationship with its owner for its key.",
    },
    Entry {
        id: "fb_007",
        category: "ER Modeling",
        question: "A relationship where one department employs many employees has which cardinality?",
        options: ["One-to-one", "One-to-many", "Many-to-many", "Zero-to-zero"],
        correct: "b",
        explanation: "One department relates to many employees while each employee belongs to one department.",
    },
    Entry {
        id: "fb_008",
        category: "SQL",
        question: "Which join returns all rows from the left table and matching rows from the right table?",
        options: ["INNER JOIN", "LEFT JOIN", "CROSS JOIN", "SELF JOIN"],
        correct: "b",
        explanation: "A LEFT (OUTER) JOIN keeps every left row, filling unmatched right columns with NULL.",
    },
    Entry {
        id: "fb_009",
        category: "SQL",
        question: "Which clause filters groups produced by GROUP BY?",
        options: ["WHERE", "HAVING", "ORDER BY", "LIMIT"],
        correct: "b",
        explanation: "HAVING applies conditions to aggregated groups; WHERE filters rows before grouping.",
    },
    Entry {
        id: "fb_010",
        category: "SQL",
        question: "Which statement category does CREATE TABLE belong to?",
        options: ["DML", "DCL", "DDL", "TCL"],
        correct: "c",
        explanation: "Data Definition Language statements define schema objects such as tables.",
    },
    Entry {
        id: "fb_011",
        category: "Transactions",
        question: "Which isolation level prevents dirty reads but still allows non-repeatable reads?",
        options: ["Read Uncommitted", "Read Committed", "Repeatable Read", "Serializable"],
        correct: "b",
        explanation: "Read Committed only exposes committed data but a re-read may see newer commits.",
    },
    Entry {
        id: "fb_012",
        category: "Transactions",
        question: "Two-phase locking guarantees which property of schedules?",
        options: ["Deadlock freedom", "Conflict serializability", "Starvation freedom", "Cascadelessness"],
        correct: "b",
        explanation: "Under 2PL every schedule is conflict serializable, though deadlocks remain possible.",
    },
    Entry {
        id: "fb_013",
        category: "Indexing",
        question: "Which index structure is the default in most relational databases?",
        options: ["Hash index", "Bitmap index", "B+ tree", "Inverted index"],
        correct: "c",
        explanation: "B+ trees support equality and range lookups with logarithmic depth.",
    },
    Entry {
        id: "fb_014",
        category: "Performance",
        question: "What does EXPLAIN show for a SQL statement?",
        options: [
            "The statement's result rows",
            "The execution plan chosen by the optimizer",
            "The table's storage size",
            "The user's privileges",
        ],
        correct: "b",
        explanation: "EXPLAIN reveals how the optimizer intends to access and join the data.",
    },
    Entry {
        id: "fb_015",
        category: "NoSQL",
        question: "Which type of NoSQL database stores data as JSON-like documents?",
        options: ["Key-value store", "Document database", "Column-family store", "Graph database"],
        correct: "b",
        explanation: "Document databases such as MongoDB store semi-structured documents.",
    },
    Entry {
        id: "fb_016",
        category: "Distributed Databases",
        question: "According to the CAP theorem, a distributed system under a network partition must trade off:",
        options: [
            "Consistency and availability",
            "Atomicity and durability",
            "Latency and throughput",
            "Sharding and replication",
        ],
        correct: "a",
        explanation: "During a partition a system can remain consistent or available, not both.",
    },
    Entry {
        id: "fb_017",
        category: "Distributed Databases",
        question: "Splitting a table's rows across servers by a key is called:",
        options: ["Replication", "Sharding", "Normalization", "Mirroring"],
        correct: "b",
        explanation: "Sharding horizontally partitions data across nodes by a shard key.",
    },
    Entry {
        id: "fb_018",
        category: "Data Warehousing",
        question: "In a star schema, the central table holding measures is the:",
        options: ["Dimension table", "Fact table", "Bridge table", "Lookup table"],
        correct: "b",
        explanation: "The fact table stores numeric measures and foreign keys to dimension tables.",
    },
    Entry {
        id: "fb_019",
        category: "Security",
        question: "Which SQL statement grants a privilege to a user?",
        options: ["ALLOW", "GRANT", "PERMIT", "ASSIGN"],
        correct: "b",
        explanation: "GRANT is the Data Control Language statement that assigns privileges.",
    },
    Entry {
        id: "fb_020",
        category: "Security",
        question: "Parameterized queries primarily protect against:",
        options: ["Deadlocks", "SQL injection", "Index fragmentation", "Replication lag"],
        correct: "b",
        explanation: "Bound parameters keep user input from being interpreted as SQL.",
    },
];

/// Curated questions served when neither generation nor the bank can answer.
pub fn fallback_questions() -> Vec<Question> {
    ENTRIES.iter().map(to_question).collect()
}

/// First `count` curated questions (fewer when the list is shorter).
pub fn fallback_slice(count: usize) -> Vec<Question> {
    ENTRIES.iter().take(count).map(to_question).collect()
}

fn to_question(entry: &Entry) -> Question {
    Question {
        id: entry.id.to_string(),
        category: entry.category.to_string(),
        question: entry.question.to_string(),
        options: OPTION_IDS
            .iter()
            .zip(entry.options.iter())
            .map(|(id, text)| QuestionOption {
                id: id.to_string(),
                text: text.to_string(),
            })
            .collect(),
        correct_answer: entry.correct.to_string(),
        explanation: entry.explanation.to_string(),
    }
}
