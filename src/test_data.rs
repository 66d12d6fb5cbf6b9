#[cfg(test)]
pub const MANIFEST_JSON: &str = r#"[
    {"name": "Post A", "file": "a.md", "link": "post-a", "date": "2020-01-01", "readtime": 5},
    {"name": "Post B", "file": "b.md", "link": "b", "date": "2020-02-01", "readtime": 0},
    {"name": "Post C", "file": "c.md", "link": "post-c", "date": "2020-03-01"}
]"#;

#[cfg(test)]
pub const POST_DATA_MD: &str = "# What I learned after 20+ years of software development
How to be a great software engineer?

Someone asked me this question today and I didn't have an answer.

## Non technical

### Have a honest image of yourself

You finished university and learned a lot. __The earlier you find that, the better.__

```rust
fn main() {
    println!(\"<hello>\");
}
```

## Technical

- Read code
- Write tests
";
