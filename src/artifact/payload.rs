//! Contents of the test image.

use serde_json::{json, Value};

/// Name of the image in its manifest.
pub const IMAGE_NAME: &str = "testprog";

/// Source of the program packaged into the image.
pub const PROGRAM_SOURCE: &str = r#"
package main

import (
	"fmt"
	"time"
)

func main() {
	for i := 3; i > 0; i -= 1 {
		fmt.Println(i)
		time.Sleep(time.Second)
	}
	fmt.Println("BANG!")
}
"#;

/// Image manifest placed at the root of the image tree.
pub fn manifest() -> Value {
    json!({
        "acKind": "ImageManifest",
        "acVersion": "0.5.1+git",
        "name": IMAGE_NAME,
        "app": {
            "exec": ["/prog"],
            "user": "0",
            "group": "0",
        },
    })
}
