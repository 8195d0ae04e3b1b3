use jiff::Timestamp;
use types::Page;
use types::user::User;

const HEADERS: [&str; 5] = ["ID", "NAME", "EMAIL", "ROLE", "CREATED"];

pub(super) fn date(timestamp: Timestamp) -> String {
    timestamp.strftime("%Y-%m-%d").to_string()
}

fn row(user: &User) -> [String; 5] {
    [
        user.id.to_string(),
        user.name.clone(),
        user.email.clone(),
        user.role.clone(),
        date(user.creation_at),
    ]
}

pub fn users_table(page: &Page<User>) -> String {
    if page.total_items == 0 {
        return "No users found.".to_string();
    }

    let rows: Vec<[String; 5]> = page.items.iter().map(row).collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(HEADERS.iter().copied(), &widths));
    lines.extend(rows.iter().map(|row| line(row.iter().map(String::as_str), &widths)));
    lines.push(format!(
        "Page {} of {} ({} users)",
        page.page, page.total_pages, page.total_items
    ));

    lines.join("\n")
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

pub fn user(user: &User) -> String {
    format!(
        "{} <{}>\nID:       {}\nRole:     {}\nAvatar:   {}\nCreated:  {}\nUpdated:  {}",
        user.name,
        user.email,
        user.id,
        user.role,
        user.avatar,
        date(user.creation_at),
        date(user.updated_at),
    )
}
