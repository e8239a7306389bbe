use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eraser_scanner::{build_ignore_ranges, IgnoreFlags};

// A medium-size source with comments, strings and emoji sprinkled in
const TYPESCRIPT_SOURCE: &str = r#"
// Service definitions 🚀
interface User {
    id: number;
    name: string; // display name ✨
}

/* Block comment with an emoji 🎉
   spanning several lines */
class UserService {
    private users = new Map<number, User>();

    greet(user: User): string {
        return `Hello, ${user.name} 👋`;
    }

    describe(): string {
        const label = "users: \"quoted\" 😀";
        return label + ' done';
    }
}
"#;

const PYTHON_SOURCE: &str = r#"
"""Module docstring 📦"""

def greet(name):  # say hi 👋
    '''Return a greeting.'''
    return "Hello, " + name + " 😀"
"#;

fn bench_scan(c: &mut Criterion) {
    let flags = IgnoreFlags {
        ignore_in_comments: true,
        ignore_in_strings: true,
        ignore_markdown: true,
    };

    let large: String = TYPESCRIPT_SOURCE.repeat(200);

    c.bench_function("scan_typescript_small", |b| {
        b.iter(|| build_ignore_ranges(black_box(TYPESCRIPT_SOURCE), "typescript", flags))
    });

    c.bench_function("scan_python_small", |b| {
        b.iter(|| build_ignore_ranges(black_box(PYTHON_SOURCE), "python", flags))
    });

    c.bench_function("scan_typescript_large", |b| {
        b.iter(|| build_ignore_ranges(black_box(&large), "typescript", flags))
    });

    let ranges = build_ignore_ranges(&large, "typescript", flags);
    c.bench_function("lookup_large", |b| {
        b.iter(|| {
            (0..large.len() as u32)
                .step_by(97)
                .filter(|&offset| ranges.contains(black_box(offset)))
                .count()
        })
    });
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
