use color_print::cformat;
use partition::{Address, Expr, PartitionMap};

/// Expression text with referenced partitions highlighted
fn cformat_expr(text: &str) -> String {
    match Expr::parse(text) {
        Some(expr) => {
            let refs = expr.refs();
            text.split_whitespace()
                .map(|word| {
                    if refs.contains(&word) {
                        cformat!("<g>{}</>", word)
                    } else {
                        word.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        }
        None => cformat!("<r,u>{}</>", text),
    }
}

/// Table of resolved partitions next to the expressions they were declared with
pub fn print_dump(declared: &PartitionMap, resolved: &PartitionMap) {
    println!("{}+{}+{}+{}", "-".repeat(21), "-".repeat(12), "-".repeat(12), "-".repeat(40));
    println!(
        " {:<19} | {:<10} | {:<10} | {}",
        "partition", "address", "size", "declared as"
    );
    println!("{}+{}+{}+{}", "-".repeat(21), "-".repeat(12), "-".repeat(12), "-".repeat(40));
    for (name, partition) in resolved.iter() {
        let addr = match partition.address {
            Address::Resolved(v) => cformat!("<y>0x{:08X}</>", v),
            _ => cformat!("<r,s>??????????</>"),
        };
        let expr = match declared.get(name).map(|p| &p.address) {
            Some(Address::Unresolved(text)) => cformat_expr(text),
            _ => String::new(),
        };
        println!(
            " {} | {} | 0x{:08X} | {}",
            cformat!("<c>{:<19}</>", name),
            addr,
            partition.size,
            expr
        );
    }
    println!("{}+{}+{}+{}", "-".repeat(21), "-".repeat(12), "-".repeat(12), "-".repeat(40));
}
