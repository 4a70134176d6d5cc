use crate::models::catalog::BlogPost;

/// Related posts returned at most.
const MAX_RELATED: usize = 4;

pub static POSTS: &[BlogPost] = &[
    BlogPost {
        id: "database-fundamentals-beginners",
        title: "Database Fundamentals: A Complete Guide for Beginners",
        excerpt: "Learn the essential concepts of databases, from basic terminology to advanced concepts like normalization and indexing.",
        content: r#"# Database Fundamentals: A Complete Guide for Beginners

Databases are the backbone of modern applications. Whether you're building a simple website or a complex enterprise system, understanding database fundamentals is crucial.

## What is a Database?

A database is an organized collection of structured information, typically stored electronically. A database management system (DBMS) controls the database, and together with the data it forms a database system.

## Key Concepts

- **Tables** are the building blocks of a relational database.
- **Rows** are individual records; **columns** are attributes of each record.
- A **primary key** uniquely identifies each row and cannot be NULL.
- A **foreign key** references the primary key of another table.

## Design Best Practices

1. Normalize your data to reduce redundancy
2. Choose appropriate data types
3. Create indexes for frequent lookups
4. Enforce referential integrity with foreign keys

Ready to test your knowledge? Try our [Database Quiz](/quiz-english)!
"#,
        author: "Think Tech DB Guru Team",
        published_at: "2024-11-10",
        read_time: "8 min read",
        tags: &["Database Fundamentals", "Beginners", "SQL", "Database Design"],
        category: "Fundamentals",
        featured: true,
        image: Some("/images/blog/database-fundamentals.jpg"),
        external_url: None,
    },
    BlogPost {
        id: "sql-query-optimization",
        title: "SQL Query Optimization: Techniques That Actually Work",
        excerpt: "Practical techniques to speed up slow queries: execution plans, indexing strategies, and rewriting subqueries.",
        content: r#"# SQL Query Optimization: Techniques That Actually Work

Query performance is critical for any database-driven application.

## Read the Execution Plan

Use `EXPLAIN` (or `EXPLAIN ANALYZE`) before changing anything.

## Index Deliberately

```sql
CREATE INDEX idx_user_email ON users(email);
CREATE INDEX idx_user_status_date ON users(status, created_date);
```

## Prefer Joins to Correlated Subqueries

```sql
SELECT DISTINCT c.* FROM customers c
INNER JOIN orders o ON c.customer_id = o.customer_id
WHERE o.total > 1000;
```

## Keep Statistics Fresh

```sql
ANALYZE your_table_name;
```

Want to test your SQL knowledge? Take our [Advanced SQL Quiz](/quiz-english)!
"#,
        author: "Think Tech DB Guru Team",
        published_at: "2024-11-05",
        read_time: "12 min read",
        tags: &["SQL", "Performance", "Query Optimization", "Indexing"],
        category: "Advanced",
        featured: true,
        image: Some("/images/blog/sql-optimization.jpg"),
        external_url: None,
    },
    BlogPost {
        id: "nosql-vs-sql",
        title: "NoSQL vs SQL: Choosing the Right Database",
        excerpt: "When to reach for a document, key-value, column-family or graph store instead of a relational database.",
        content: r#"# NoSQL vs SQL: Choosing the Right Database

Choosing a database technology is one of the most important architectural decisions you'll make.

| Factor | Relational DB | NoSQL |
|--------|---------------|-------|
| Data structure | Fixed schema | Flexible schema |
| Scalability | Vertical | Horizontal |
| Consistency | Strong (ACID) | Eventual (BASE) |

Modern applications often combine several database types. Start simple and evolve as your requirements become clearer.

Test your understanding with our [Database Quiz](/quiz-english)!
"#,
        author: "Think Tech DB Guru Team",
        published_at: "2024-10-28",
        read_time: "10 min read",
        tags: &["NoSQL", "SQL", "Database Design", "Architecture"],
        category: "Architecture",
        featured: false,
        image: Some("/images/blog/nosql-vs-sql.jpg"),
        external_url: Some("https://medium.com/@your-handle/nosql-vs-sql"),
    },
];

pub fn post_by_id(id: &str) -> Option<&'static BlogPost> {
    POSTS.iter().find(|post| post.id == id)
}

pub fn featured_posts() -> Vec<&'static BlogPost> {
    POSTS.iter().filter(|post| post.featured).collect()
}

pub fn posts_by_category(category: &str) -> Vec<&'static BlogPost> {
    POSTS
        .iter()
        .filter(|post| post.category.eq_ignore_ascii_case(category))
        .collect()
}

pub fn categories() -> Vec<&'static str> {
    distinct(POSTS.iter().map(|post| post.category))
}

pub fn tags() -> Vec<&'static str> {
    distinct(POSTS.iter().flat_map(|post| post.tags.iter().copied()))
}

/// Posts from the same category; tag matches from other categories are
/// appended when fewer than two share the category.
pub fn related_posts(id: &str) -> Vec<&'static BlogPost> {
    let Some(current) = post_by_id(id) else {
        return Vec::new();
    };

    let mut related: Vec<&'static BlogPost> = POSTS
        .iter()
        .filter(|post| post.id != id && post.category == current.category)
        .collect();

    if related.len() < 2 {
        related.extend(POSTS.iter().filter(|post| {
            post.id != id
                && post.category != current.category
                && post.tags.iter().any(|tag| current.tags.contains(tag))
        }));
    }

    related.truncate(MAX_RELATED);
    related
}

fn distinct(values: impl Iterator<Item = &'static str>) -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}
