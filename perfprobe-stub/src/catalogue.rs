use perfprobe_common::Book;

/// Fixed catalogue served by the stub. Ids are stable so tests can assert on them.
pub fn catalogue() -> Vec<Book> {
    [
        (1, "Dune", "Frank Herbert", "fiction"),
        (2, "Dune Messiah", "Frank Herbert", "fiction"),
        (3, "The Rust Programming Language", "Steve Klabnik", "computing"),
        (4, "Programming Rust", "Jim Blandy", "computing"),
        (5, "The Left Hand of Darkness", "Ursula K. Le Guin", "fiction"),
        (6, "A Brief History of Time", "Stephen Hawking", "science"),
        (7, "The Selfish Gene", "Richard Dawkins", "science"),
        (8, "Structure and Interpretation of Computer Programs", "Harold Abelson", "computing"),
        (9, "The Dispossessed", "Ursula K. Le Guin", "fiction"),
        (10, "Cosmos", "Carl Sagan", "science"),
    ]
    .into_iter()
    .map(|(id, title, author, category)| Book {
        id,
        title: title.to_string(),
        author: author.to_string(),
        category: category.to_string(),
    })
    .collect()
}
